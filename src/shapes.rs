use nalgebra::{self as na, vector};

use crate::{P2, V2};

/// Trait for anything that occupies an axis-aligned box in the plane.
///
/// The [`QuadTree`](crate::QuadTree) only ever reads bounds through this trait, so any
/// collection of boxed things can be indexed without handing the tree ownership.
pub trait Bounded {
    /// Get the bounding box
    fn bounds(&self) -> &BoundingBox;
}

/// Trait for things that can be flagged by a collision pass.
pub trait Collidable: Bounded {
    /// Record that this item overlaps some other item
    fn mark_colliding(&mut self);
}

/// An axis-aligned rectangle described by its center point and half-extents.
///
/// Half-extents are expected to be non-negative and every coordinate finite. Neither is
/// checked: a box holding NaN simply compares as overlapping nothing sensible.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    center: P2,
    half_extents: V2,
}

impl BoundingBox {
    /// Create a new box from a center point and half-extents
    pub fn new(center: P2, half_extents: V2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Create a new box from raw center coordinates and half-extents
    pub fn from_coords(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Self::new(na::point![x, y], vector![half_width, half_height])
    }

    pub fn center(&self) -> P2 {
        self.center
    }

    pub fn half_extents(&self) -> V2 {
        self.half_extents
    }

    pub fn x(&self) -> f64 {
        self.center.x
    }

    pub fn y(&self) -> f64 {
        self.center.y
    }

    pub fn half_width(&self) -> f64 {
        self.half_extents.x
    }

    pub fn half_height(&self) -> f64 {
        self.half_extents.y
    }

    /// Get the corner with the smallest coordinates
    pub fn min(&self) -> P2 {
        self.center - self.half_extents
    }

    /// Get the corner with the largest coordinates
    pub fn max(&self) -> P2 {
        self.center + self.half_extents
    }

    /// Move the box so it is centered on `center`
    pub fn set_center(&mut self, center: P2) {
        self.center = center;
    }

    /// Shift the box by `delta`
    pub fn translate(&mut self, delta: V2) {
        self.center += delta;
    }

    /// Check if a point lies within the box, edges included
    pub fn contains(&self, point: &P2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Check if the box shares any space with another box.
    ///
    /// Separating-axis test on both axes. Boxes that only touch along an edge or at a
    /// corner count as intersecting.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        let (a, b) = (self, other);
        !(a.x() - a.half_width() > b.x() + b.half_width()
            || a.x() + a.half_width() < b.x() - b.half_width()
            || a.y() - a.half_height() > b.y() + b.half_height()
            || a.y() + a.half_height() < b.y() - b.half_height())
    }

    /// Quarter the box around its center.
    ///
    /// Quadrants are ordered top-left, top-right, bottom-left, bottom-right with `y`
    /// growing downward.
    pub fn quarter(&self) -> [Self; 4] {
        let half = self.half_extents / 2.0;
        let dx = vector![half.x, 0.0];
        let dy = vector![0.0, half.y];
        let c = self.center;

        [
            Self::new(c - dx - dy, half),
            Self::new(c + dx - dy, half),
            Self::new(c - dx + dy, half),
            Self::new(c + dx + dy, half),
        ]
    }
}

impl Bounded for BoundingBox {
    fn bounds(&self) -> &BoundingBox {
        self
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use crate::util::tests::make_box;

    use super::*;

    #[test]
    fn box_properties() {
        let b = make_box(5.0, 5.0, 5.0, 2.0);
        assert_eq!(b.min(), point![0.0, 3.0], "Min corner should be at (0.0, 3.0)");
        assert_eq!(b.max(), point![10.0, 7.0], "Max corner should be at (10.0, 7.0)");
        assert_eq!(b.center(), point![5.0, 5.0], "Center should be at (5.0, 5.0)");
        assert_eq!(b.half_width(), 5.0, "Half width should be 5.0");
        assert_eq!(b.half_height(), 2.0, "Half height should be 2.0");
    }

    #[test]
    fn box_contains_point() {
        let b = make_box(5.0, 5.0, 5.0, 5.0);
        assert!(
            b.contains(&point![5.0, 5.0]),
            "Box should contain point (5.0, 5.0)"
        );
        assert!(
            !b.contains(&point![-1.0, 5.0]),
            "Box should not contain point (-1.0, 5.0)"
        );
        assert!(
            b.contains(&point![0.0, 0.0]),
            "Box should contain its min corner (0.0, 0.0)"
        );
        assert!(
            b.contains(&point![10.0, 10.0]),
            "Box should contain its max corner (10.0, 10.0)"
        );
    }

    #[test]
    fn box_intersects_with_another_box() {
        let b1 = make_box(5.0, 5.0, 5.0, 5.0);

        let b2 = make_box(10.0, 10.0, 5.0, 5.0);
        assert!(b1.intersects(&b2), "B1 should intersect with B2");

        let b3 = make_box(15.0, 15.0, 5.0, 5.0);
        assert!(
            b1.intersects(&b3),
            "B1 should touch B3 at the corner, counting as intersect"
        );

        let b4 = make_box(16.0, 16.0, 5.0, 5.0);
        assert!(!b1.intersects(&b4), "B1 should not intersect with B4");

        let b5 = make_box(-3.0, -3.0, 2.0, 2.0);
        assert!(!b1.intersects(&b5), "B1 should not intersect with B5");

        let b6 = make_box(5.0, 5.0, 2.0, 2.0);
        assert!(
            b1.intersects(&b6),
            "B6 is entirely inside B1, should intersect"
        );

        let b7 = make_box(-5.5, 5.0, 4.5, 5.0);
        assert!(
            !b1.intersects(&b7),
            "B1 should not intersect with B7 on the left"
        );

        let b8 = make_box(5.0, -5.5, 5.0, 4.5);
        assert!(!b1.intersects(&b8), "B1 should not intersect with B8 above it");

        let b9 = make_box(5.0, 15.0, 5.0, 5.0);
        assert!(
            b1.intersects(&b9),
            "B1 should touch B9 at the bottom, counting as intersect"
        );

        let b10 = make_box(15.0, 5.0, 5.0, 5.0);
        assert!(
            b1.intersects(&b10),
            "B1 should touch B10 on the right, counting as intersect"
        );

        let b11 = make_box(5.0, 50.0, 100.0, 1.0);
        assert!(
            !b1.intersects(&b11),
            "Overlap on x alone should not count as intersect"
        );
    }

    #[test]
    fn intersection_is_symmetric_and_reflexive() {
        let boxes = [
            make_box(0.0, 0.0, 1.0, 1.0),
            make_box(1.5, 0.0, 0.5, 0.5),
            make_box(-3.0, 2.0, 0.0, 0.0),
            make_box(100.0, 100.0, 5.0, 5.0),
            make_box(108.0, 100.0, 5.0, 5.0),
            make_box(120.0, 100.0, 5.0, 5.0),
        ];
        for a in &boxes {
            assert!(a.intersects(a), "A box should always intersect itself");
            for b in &boxes {
                assert_eq!(
                    a.intersects(b),
                    b.intersects(a),
                    "Intersection should be symmetric for {a:?} and {b:?}"
                );
            }
        }
    }

    #[test]
    fn zero_sized_box_intersects_itself() {
        let b = make_box(3.0, 4.0, 0.0, 0.0);
        assert!(b.intersects(&b), "A degenerate box should intersect itself");
        assert!(
            make_box(3.0, 4.0, 1.0, 1.0).intersects(&b),
            "A box should intersect a point box inside it"
        );
    }

    #[test]
    fn quartering_box() {
        let b = make_box(300.0, 300.0, 300.0, 300.0);
        let quarters = b.quarter();
        assert_eq!(
            quarters[0],
            make_box(150.0, 150.0, 150.0, 150.0),
            "Top-left quarter should match expected dimensions"
        );
        assert_eq!(
            quarters[1],
            make_box(450.0, 150.0, 150.0, 150.0),
            "Top-right quarter should match expected dimensions"
        );
        assert_eq!(
            quarters[2],
            make_box(150.0, 450.0, 150.0, 150.0),
            "Bottom-left quarter should match expected dimensions"
        );
        assert_eq!(
            quarters[3],
            make_box(450.0, 450.0, 150.0, 150.0),
            "Bottom-right quarter should match expected dimensions"
        );
    }

    #[test]
    fn translate_and_set_center() {
        let mut b = make_box(1.0, 1.0, 2.0, 3.0);
        b.translate(vector![1.5, -0.5]);
        assert_eq!(b.center(), point![2.5, 0.5], "Translate should shift the center");
        b.set_center(point![10.0, 20.0]);
        assert_eq!(b, make_box(10.0, 20.0, 2.0, 3.0), "Extents should be unchanged");
    }
}

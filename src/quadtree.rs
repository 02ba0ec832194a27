use log::trace;
use nalgebra::vector;

use crate::{
    shapes::{Bounded, BoundingBox, Collidable},
    util::{flag_if_overlapping, unordered_pairs},
    P2,
};

/// A depth-bounded quadtree over axis-aligned boxes.
///
/// The tree never owns what it indexes. Items are referred to by their position in a
/// slice owned by the caller, and every operation that needs geometry takes that slice.
/// The same slice must be passed to every call on a given tree.
///
/// Items are inserted into every leaf their box touches, so a box straddling a split
/// line is resident in several leaves at once. Queries may therefore report the same
/// index more than once, and [`check_collisions`](Self::check_collisions) may examine
/// the same pair in several leaves.
#[derive(Debug)]
pub struct QuadTree {
    root: Node,
    capacity: usize,
    max_depth: usize,
}

impl QuadTree {
    /// Create a new empty quadtree
    ///
    /// ## Arguments
    /// - `boundary`: The region covered by the root node
    /// - `capacity`: The number of items a leaf can hold before subdividing
    /// - `max_depth`: Nodes at this depth or deeper never subdivide
    pub fn new(boundary: BoundingBox, capacity: usize, max_depth: usize) -> Self {
        Self {
            root: Node::new(boundary, capacity, 0, max_depth),
            capacity,
            max_depth,
        }
    }

    /// Insert `items[id]` into every leaf its box touches
    ///
    /// **Returns** false if the box lies wholly outside the tree's boundary, in which
    /// case nothing was indexed
    pub fn insert<T: Bounded>(&mut self, items: &[T], id: usize) -> bool {
        self.root.insert(items, id, self.max_depth)
    }

    /// Insert every item of the slice
    ///
    /// **Returns** the number of items that landed inside the boundary
    pub fn insert_all<T: Bounded>(&mut self, items: &[T]) -> usize {
        (0..items.len())
            .filter(|&id| self.insert(items, id))
            .count()
    }

    /// Queries the tree for items whose box intersects `region`.
    /// This method appends the indices it finds to `results`, duplicates included.
    pub fn query<T: Bounded>(&self, items: &[T], region: &BoundingBox, results: &mut Vec<usize>) {
        self.root.query(items, region, results)
    }

    /// Like [`query`](Self::query), but the results are sorted with duplicates removed
    pub fn query_unique<T: Bounded>(&self, items: &[T], region: &BoundingBox) -> Vec<usize> {
        let mut results = Vec::new();
        self.query(items, region, &mut results);
        results.sort_unstable();
        results.dedup();
        results
    }

    /// Flag every pair of items sharing a leaf whose boxes overlap.
    ///
    /// **Returns** the number of pairs examined across all leaves. A pair sharing more than
    /// one leaf is examined (and counted) once per shared leaf, so this is a measure of work
    /// done rather than a count of distinct overlapping pairs.
    pub fn check_collisions<T: Collidable>(&self, items: &mut [T]) -> usize {
        self.root.check_collisions(items)
    }

    /// Get the boundary rect of the quadtree
    pub fn boundary(&self) -> &BoundingBox {
        self.root.boundary()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn is_subdivided(&self) -> bool {
        matches!(self.root, Node::Internal { .. })
    }

    /// Walk the tree depth first, parents before children.
    ///
    /// `f` receives each node's boundary, its depth, and its residents if it is a leaf.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&BoundingBox, usize, Option<&[usize]>),
    {
        self.root.visit(&mut f)
    }

    /// The two lines splitting each internal node into quadrants, for drawing overlays
    pub fn dividers(&self) -> Vec<(P2, P2)> {
        let mut lines = Vec::new();
        self.visit(|boundary, _, residents| {
            if residents.is_some() {
                return;
            }
            let c = boundary.center();
            let dx = vector![boundary.half_width(), 0.0];
            let dy = vector![0.0, boundary.half_height()];
            lines.push((c - dy, c + dy));
            lines.push((c - dx, c + dx));
        });
        lines
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(|_, _, _| count += 1);
        count
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit(|_, _, residents| {
            if residents.is_some() {
                count += 1
            }
        });
        count
    }

    /// Depth of the deepest node
    pub fn height(&self) -> usize {
        let mut height = 0;
        self.visit(|_, depth, _| height = height.max(depth));
        height
    }
}

/// QuadTree node enum
///
/// ## Variants
/// - `Internal`: Has delegated its region to four children, one per quadrant.
/// - `Leaf`: Holds the indices of the items touching its region.
#[derive(Debug)]
enum Node {
    Internal {
        boundary: BoundingBox,
        depth: usize,
        children: [Box<Self>; 4],
    },
    Leaf {
        boundary: BoundingBox,
        depth: usize,
        /// Zero once `depth` reaches the maximum, which disables subdivision
        capacity: usize,
        residents: Vec<usize>,
    },
}

impl Node {
    fn new(boundary: BoundingBox, capacity: usize, depth: usize, max_depth: usize) -> Self {
        let capacity = if depth >= max_depth { 0 } else { capacity };
        Self::Leaf {
            boundary,
            depth,
            capacity,
            residents: Vec::new(),
        }
    }

    fn insert<T: Bounded>(&mut self, items: &[T], id: usize, max_depth: usize) -> bool {
        if !self.boundary().intersects(items[id].bounds()) {
            return false;
        }

        match self {
            Self::Leaf {
                boundary,
                depth,
                capacity,
                residents,
            } => {
                residents.push(id);
                if residents.len() <= *capacity || *capacity == 0 {
                    return true;
                }

                let (boundary, depth, capacity) = (*boundary, *depth, *capacity);
                let residents = std::mem::take(residents);
                trace!(
                    "subdividing node at depth {} with {} residents",
                    depth,
                    residents.len()
                );

                let mut children = boundary
                    .quarter()
                    .map(|q| Box::new(Self::new(q, capacity, depth + 1, max_depth)));
                for &resident in &residents {
                    for child in children.iter_mut() {
                        child.insert(items, resident, max_depth);
                    }
                }
                *self = Self::Internal {
                    boundary,
                    depth,
                    children,
                };
            }
            Self::Internal { children, .. } => {
                for child in children.iter_mut() {
                    child.insert(items, id, max_depth);
                }
            }
        }
        true
    }

    fn query<T: Bounded>(&self, items: &[T], region: &BoundingBox, results: &mut Vec<usize>) {
        if !region.intersects(self.boundary()) {
            return;
        }

        match self {
            Self::Leaf { residents, .. } => results.extend(
                residents
                    .iter()
                    .copied()
                    .filter(|&id| region.intersects(items[id].bounds())),
            ),
            Self::Internal { children, .. } => {
                for child in children {
                    child.query(items, region, results);
                }
            }
        }
    }

    fn check_collisions<T: Collidable>(&self, items: &mut [T]) -> usize {
        match self {
            Self::Leaf { residents, .. } => {
                let mut pairs = 0;
                for (i, j) in unordered_pairs(residents.len()) {
                    flag_if_overlapping(items, residents[i], residents[j]);
                    pairs += 1;
                }
                pairs
            }
            Self::Internal { children, .. } => children
                .iter()
                .map(|child| child.check_collisions(items))
                .sum(),
        }
    }

    fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&BoundingBox, usize, Option<&[usize]>),
    {
        match self {
            Self::Leaf {
                boundary,
                depth,
                residents,
                ..
            } => f(boundary, *depth, Some(residents.as_slice())),
            Self::Internal {
                boundary,
                depth,
                children,
            } => {
                f(boundary, *depth, None);
                for child in children {
                    child.visit(f);
                }
            }
        }
    }

    fn boundary(&self) -> &BoundingBox {
        match self {
            Self::Leaf { boundary, .. } => boundary,
            Self::Internal { boundary, .. } => boundary,
        }
    }
}

use nalgebra::vector;
use rand::Rng;

use crate::{
    config::Config,
    shapes::{Bounded, BoundingBox, Collidable},
};

/// Largest random change, in whole degrees, applied to the heading after a wall bounce
const BOUNCE_JITTER: i32 = 10;

/// A box moving in a straight line across the arena and bouncing off its walls.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    bounds: BoundingBox,
    /// Direction of travel in degrees
    heading: f64,
    colliding: bool,
}

impl Body {
    /// Create a new body centered at `(x, y)` travelling along `heading` degrees
    pub fn spawn(x: f64, y: f64, half_width: f64, half_height: f64, heading: f64) -> Self {
        Self {
            bounds: BoundingBox::from_coords(x, y, half_width, half_height),
            heading,
            colliding: false,
        }
    }

    /// Create a new body with a random whole-degree heading in `[0, 360)`
    pub fn spawn_random<R: Rng + ?Sized>(
        x: f64,
        y: f64,
        half_width: f64,
        half_height: f64,
        rng: &mut R,
    ) -> Self {
        let heading: i32 = rng.gen_range(0..360);
        Self::spawn(x, y, half_width, half_height, f64::from(heading))
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    /// Clear the collision flag ahead of a new detection pass
    pub fn reset_collision(&mut self) {
        self.colliding = false;
    }

    /// Move one step along the heading, bouncing off the arena walls.
    ///
    /// A body crossing a wall is clamped back onto it and its heading is mirrored, then
    /// nudged by a random whole number of degrees in `[-10, 10]` so bodies do not settle
    /// into periodic orbits. The left/right walls are handled before the top/bottom
    /// ones, each with its own nudge. The collision flag is left alone.
    pub fn advance<R: Rng + ?Sized>(&mut self, config: &Config, rng: &mut R) {
        let theta = self.heading.to_radians();
        self.bounds
            .translate(vector![theta.cos(), theta.sin()] * config.speed);

        let mut center = self.bounds.center();
        let (hw, hh) = (self.bounds.half_width(), self.bounds.half_height());

        if center.x < hw {
            center.x = hw;
            self.heading = 180.0 - self.heading + jitter(rng);
        } else if center.x > config.width - hw {
            center.x = config.width - hw;
            self.heading = 180.0 - self.heading + jitter(rng);
        }

        if center.y < hh {
            center.y = hh;
            self.heading = -self.heading + jitter(rng);
        } else if center.y > config.height - hh {
            center.y = config.height - hh;
            self.heading = -self.heading + jitter(rng);
        }

        self.bounds.set_center(center);
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(-BOUNCE_JITTER..=BOUNCE_JITTER))
}

impl Bounded for Body {
    fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }
}

impl Collidable for Body {
    fn mark_colliding(&mut self) {
        self.colliding = true;
    }
}

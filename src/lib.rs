//! A depth-bounded quadtree broadphase for axis-aligned bounding boxes.
//!
//! Bodies live in a flat collection owned by the caller. Every step a fresh
//! [`QuadTree`] is built over that collection, its leaves are scanned for
//! overlapping pairs, and the result can be compared against the all-pairs
//! [`brute_force`] pass.

use nalgebra::{Point2, Vector2};

pub mod body;
pub mod config;
pub mod detect;
pub mod quadtree;
pub mod shapes;
pub mod simulation;
mod util;

pub use body::Body;
pub use config::{Config, ConfigError};
pub use detect::{brute_force, PassStats, StepReport};
pub use quadtree::QuadTree;
pub use shapes::{Bounded, BoundingBox, Collidable};
pub use simulation::Simulation;

/// 2d point type used for positions
pub type P2 = Point2<f64>;

/// 2d vector type used for extents and displacements
pub type V2 = Vector2<f64>;

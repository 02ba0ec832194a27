//! Simulation constants.

use thiserror::Error;

use crate::shapes::BoundingBox;

/// Error type for an unusable [`Config`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Arena width or height is not a positive finite number.
    #[error("arena must have positive finite size, got {width} x {height}")]
    Arena { width: f64, height: f64 },
    /// Speed is negative or not finite.
    #[error("speed must be finite and non-negative, got {0}")]
    Speed(f64),
    /// Body half-extents are negative or not finite.
    #[error("body half-extents must be finite and non-negative, got {0} x {1}")]
    BodyExtents(f64, f64),
    /// Bodies would not fit between the arena walls.
    #[error("bodies of half-extents {half_width} x {half_height} do not fit in a {width} x {height} arena")]
    BodyTooLarge {
        half_width: f64,
        half_height: f64,
        width: f64,
        height: f64,
    },
    /// A spawn action would create no bodies.
    #[error("spawn batch must be at least 1")]
    SpawnBatch,
}

/// Parameters for the arena, the bodies moving in it and the tree built over it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Arena width; bodies bounce off `x = 0` and `x = width`
    pub width: f64,
    /// Arena height; bodies bounce off `y = 0` and `y = height`
    pub height: f64,
    /// Depth at which tree nodes stop subdividing
    pub max_depth: usize,
    /// Resident count above which a leaf subdivides
    pub capacity: usize,
    /// Distance a body travels per step
    pub speed: f64,
    pub body_half_width: f64,
    pub body_half_height: f64,
    /// Bodies created per spawn action
    pub spawn_batch: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            max_depth: 3,
            capacity: 2,
            speed: 1.5,
            body_half_width: 5.0,
            body_half_height: 5.0,
            spawn_batch: 100,
        }
    }
}

impl Config {
    /// Check that the config describes a usable simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.width, self.height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::Arena { width, height });
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(ConfigError::Speed(self.speed));
        }

        let (half_width, half_height) = (self.body_half_width, self.body_half_height);
        if !(half_width.is_finite() && half_height.is_finite())
            || half_width < 0.0
            || half_height < 0.0
        {
            return Err(ConfigError::BodyExtents(half_width, half_height));
        }
        if 2.0 * half_width > width || 2.0 * half_height > height {
            return Err(ConfigError::BodyTooLarge {
                half_width,
                half_height,
                width,
                height,
            });
        }

        if self.spawn_batch == 0 {
            return Err(ConfigError::SpawnBatch);
        }
        Ok(())
    }

    /// The region covering the whole arena, used as the tree root
    pub fn arena(&self) -> BoundingBox {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        BoundingBox::from_coords(hw, hh, hw, hh)
    }
}

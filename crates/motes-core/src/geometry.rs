//! Geometry helpers shared by the particle animations.

use glam::Vec2;
use rand::{Rng, distributions::Standard};

/// Axis-aligned rectangle particles live in, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Bounds covering a surface of the given pixel size.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.width() * 0.5 + self.left,
            self.height() * 0.5 + self.top,
        )
    }
}

/// Uniform sample in `[min, max)`.
///
/// Unlike `Rng::gen_range` this tolerates an empty range and returns `min`.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let t: f32 = rng.sample(Standard);
    t * (max - min) + min
}

/// Uniform heading in `[0, 2π)`.
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    random_between(rng, 0.0, std::f32::consts::TAU)
}

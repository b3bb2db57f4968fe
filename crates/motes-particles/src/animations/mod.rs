//! The particle types, one module per animation.
//!
//! Every settings struct carries the reference values tuned for a
//! high-resolution canvas; call `scaled` to shrink the spatial fields down to
//! the terminal raster.

pub mod chaser;
pub mod flag;
pub mod mesh;
pub mod metaball;
pub mod parallax;
pub mod square;

pub use chaser::{Chaser, ChaserSettings};
pub use flag::{Flag, FlagSettings, points_grid};
pub use mesh::{Mesh, MeshSettings};
pub use metaball::{Metaball, MetaballSettings};
pub use parallax::{Parallax, ParallaxSettings};
pub use square::{Square, SquareSettings};

use motes_core::Vec2;

/// Push `velocity` away from `at` when it is within `distance` of `position`.
///
/// The push fades linearly from `multiplier` at the particle to zero at the
/// edge of the range.
pub(crate) fn flee(velocity: &mut Vec2, position: Vec2, at: Vec2, distance: f32, multiplier: f32) {
    let delta = at - position;
    let dist = delta.length();
    if dist < distance {
        let push = (distance - dist) / distance * multiplier;
        let angle = delta.y.atan2(delta.x);
        velocity.x -= angle.cos() * push;
        velocity.y -= angle.sin() * push;
    }
}

/// Ease `value` back toward `original`, snapping once closer than `snap`.
pub(crate) fn recover(value: &mut Vec2, original: Vec2, speed: f32, snap: f32) {
    recover_axis(&mut value.x, original.x, speed, snap);
    recover_axis(&mut value.y, original.y, speed, snap);
}

fn recover_axis(value: &mut f32, original: f32, speed: f32, snap: f32) {
    if *value != original {
        let diff = original - *value;
        if diff.abs() < snap {
            *value = original;
        } else {
            *value += diff * speed;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use motes_core::{Bounds, MotesRng, Paint, Rgb, Surface, SurfaceEffect, Vec2};
    use rand::SeedableRng;

    /// One recorded draw call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Draw {
        Circle { center: Vec2, radius: f32, paint: Paint },
        Line { from: Vec2, to: Vec2, width: f32, paint: Paint },
        Polygon { points: Vec<Vec2>, paint: Paint },
    }

    /// Surface that records draw calls instead of rasterizing them.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub draws: Vec<Draw>,
        pub effect: SurfaceEffect,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ..Default::default()
            }
        }

        pub fn lines(&self) -> Vec<&Draw> {
            self.draws
                .iter()
                .filter(|d| matches!(d, Draw::Line { .. }))
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }
        fn clear(&mut self) {
            self.draws.clear();
        }
        fn fill(&mut self, _color: Rgb) {
            self.draws.clear();
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, paint: Paint) {
            self.draws.push(Draw::Circle {
                center,
                radius,
                paint,
            });
        }
        fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, paint: Paint) {
            self.draws.push(Draw::Line {
                from,
                to,
                width,
                paint,
            });
        }
        fn fill_polygon(&mut self, points: &[Vec2], paint: Paint) {
            self.draws.push(Draw::Polygon {
                points: points.to_vec(),
                paint,
            });
        }
        fn set_effect(&mut self, effect: SurfaceEffect) {
            self.effect = effect;
        }
    }

    pub fn rng() -> MotesRng {
        MotesRng::seed_from_u64(0x5eed)
    }

    pub fn canvas() -> Bounds {
        Bounds::from_size(800.0, 400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flee_pushes_away_from_point() {
        let mut v = Vec2::ZERO;
        flee(&mut v, Vec2::new(10.0, 10.0), Vec2::new(15.0, 10.0), 10.0, 2.0);
        assert!((v.x + 1.0).abs() < 1e-5);
        assert!(v.y.abs() < 1e-5);
    }

    #[test]
    fn test_flee_ignores_far_points() {
        let mut v = Vec2::new(1.0, 1.0);
        flee(&mut v, Vec2::ZERO, Vec2::new(100.0, 0.0), 50.0, 2.0);
        assert_eq!(v, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_recover_eases_then_snaps() {
        let mut v = Vec2::new(10.0, -4.0);
        recover(&mut v, Vec2::ZERO, 0.5, 0.5);
        assert_eq!(v, Vec2::new(5.0, -2.0));
        let mut near = Vec2::new(0.3, 0.0);
        recover(&mut near, Vec2::ZERO, 0.5, 0.5);
        assert_eq!(near, Vec2::ZERO);
    }
}

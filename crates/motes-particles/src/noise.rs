//! Shared simplex noise field for the flag animation.

use std::fmt;

use ::noise::{NoiseFn, Simplex};

/// 3D simplex noise sampled by every flag dot.
///
/// Dots only wave in unison when they sample the same field, so the backdrop
/// builds one and hands each dot an `Arc` to it.
#[derive(Clone)]
pub struct NoiseField {
    seed: u32,
    simplex: Simplex,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: Simplex::new(seed),
        }
    }

    /// Noise value, roughly in `[-1, 1]`.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.simplex.get([x as f64, y as f64, z as f64]) as f32
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        for i in 0..20 {
            let t = i as f32 * 0.37;
            assert_eq!(a.sample(t, t * 2.0, 0.5), b.sample(t, t * 2.0, 0.5));
        }
    }

    #[test]
    fn test_samples_are_bounded() {
        let field = NoiseField::new(7);
        for i in 0..200 {
            let t = i as f32 * 0.113;
            let v = field.sample(t, -t, t * 0.5);
            assert!((-1.5..=1.5).contains(&v));
        }
    }
}

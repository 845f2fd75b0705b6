//! Gradient noise sources sampled by the fractal accumulator.

use noise::{NoiseFn, Perlin};

/// A 2D gradient noise function with output in `[0, 1]`.
pub trait GradientNoise {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> GradientNoise for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Classic Perlin noise remapped from `[-1, 1]` to `[0, 1]`.
///
/// The permutation table is fixed; variation between seeds comes entirely
/// from the octave offsets.
#[derive(Clone, Debug)]
pub struct UnitPerlin {
    perlin: Perlin,
}

impl UnitPerlin {
    pub const LATTICE_SEED: u32 = 0;

    pub fn new() -> Self {
        Self::with_lattice_seed(Self::LATTICE_SEED)
    }

    /// Use a different permutation table.
    pub fn with_lattice_seed(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl Default for UnitPerlin {
    fn default() -> Self {
        Self::new()
    }
}

impl GradientNoise for UnitPerlin {
    #[inline]
    fn sample(&self, x: f64, y: f64) -> f64 {
        ((self.perlin.get([x, y]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

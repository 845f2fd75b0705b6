//! Fractal noise fields: seeded multi-octave gradient noise normalized to `[0, 1]`.

mod error;
mod fbm;
mod field;
mod gradient;
mod offsets;

pub use error::NoiseError;
pub use fbm::{MIN_SCALE, NoiseParams, generate, generate_with, height_2d, height_3d};
pub use field::{FieldShape, ScalarField, inverse_lerp};
pub use gradient::{GradientNoise, UnitPerlin};
pub use offsets::{OFFSET_RANGE, octave_rng, offsets_2d, offsets_3d};

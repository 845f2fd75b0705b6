//! Multi-octave fractal noise fields.
//!
//! Layers several octaves of gradient noise per cell, then stretches the
//! result so the field spans exactly `[0, 1]`.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::NoiseError;
use crate::field::{FieldShape, ScalarField};
use crate::gradient::{GradientNoise, UnitPerlin};
use crate::offsets::{offsets_2d, offsets_3d};

/// Smallest usable scale; non-positive scales are clamped to this.
pub const MIN_SCALE: f64 = 0.001;

/// Parameters for fractal noise field generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Zoom factor. Larger values stretch features over more cells.
    pub scale: f64,
    /// Number of noise layers to composite. Zero yields a flat field.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Seed for the octave offsets.
    pub seed: i64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 25.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 0,
        }
    }
}

impl NoiseParams {
    /// The scale actually used for sampling.
    pub fn sanitized_scale(&self) -> f64 {
        if self.scale <= 0.0 {
            MIN_SCALE
        } else {
            self.scale
        }
    }
}

/// Running amplitude/frequency state shared by the 2D and 3D accumulators.
struct Octave {
    amplitude: f64,
    frequency: f64,
}

impl Octave {
    fn first() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 1.0,
        }
    }

    fn advance(&mut self, params: &NoiseParams) {
        self.amplitude *= params.persistence;
        self.frequency *= params.lacunarity;
    }
}

/// Raw (un-normalized) fractal height at `(x, y)` of a `width × height` grid.
pub fn height_2d<N: GradientNoise + ?Sized>(
    noise: &N,
    params: &NoiseParams,
    offsets: &[DVec2],
    (x, y): (usize, usize),
    (width, height): (usize, usize),
) -> f64 {
    let scale = params.sanitized_scale();
    let half_w = width as f64 / 2.0;
    let half_h = height as f64 / 2.0;
    let mut octave = Octave::first();
    let mut total = 0.0;

    for offset in offsets {
        let sx = (x as f64 - half_w) / scale * octave.frequency + offset.x;
        let sy = (y as f64 - half_h) / scale * octave.frequency + offset.y;
        let value = noise.sample(sx, sy) * 2.0 - 1.0;
        total += value * octave.amplitude;
        octave.advance(params);
    }

    total
}

/// Raw fractal value at `(x, y, z)` of a volume.
///
/// Each octave multiplies two planar samples, `(x, y)` and `(z, y)`, rather
/// than evaluating true 3D noise.
pub fn height_3d<N: GradientNoise + ?Sized>(
    noise: &N,
    params: &NoiseParams,
    offsets: &[DVec3],
    (x, y, z): (usize, usize, usize),
    (width, height, depth): (usize, usize, usize),
) -> f64 {
    let scale = params.sanitized_scale();
    let half = DVec3::new(width as f64, height as f64, depth as f64) / 2.0;
    let cell = DVec3::new(x as f64, y as f64, z as f64);
    let mut octave = Octave::first();
    let mut total = 0.0;

    for offset in offsets {
        let s = (cell - half) / scale * octave.frequency + *offset;
        let value = noise.sample(s.x, s.y) * noise.sample(s.z, s.y) * 2.0 - 1.0;
        total += value * octave.amplitude;
        octave.advance(params);
    }

    total
}

/// Generate a normalized field with the default Perlin source.
pub fn generate(shape: FieldShape, params: &NoiseParams) -> Result<ScalarField, NoiseError> {
    generate_with(&UnitPerlin::new(), shape, params)
}

/// Generate a normalized field from an arbitrary gradient noise source.
///
/// # Errors
///
/// Returns [`NoiseError::InvalidArgument`] if any extent of `shape` is zero,
/// or if the octave sum leaves the finite `f64` range (extreme persistence or
/// lacunarity).
pub fn generate_with<N: GradientNoise + ?Sized>(
    noise: &N,
    shape: FieldShape,
    params: &NoiseParams,
) -> Result<ScalarField, NoiseError> {
    shape.validate()?;
    if params.scale <= 0.0 {
        tracing::warn!(
            "Noise scale {} is not positive, clamping to {MIN_SCALE}",
            params.scale
        );
    }

    let (width, height, depth) = shape.extents();
    let mut raw = Vec::with_capacity(shape.len());

    match shape {
        FieldShape::Flat { .. } => {
            let offsets = offsets_2d(params.seed, params.octaves);
            for y in 0..height {
                for x in 0..width {
                    raw.push(height_2d(noise, params, &offsets, (x, y), (width, height)));
                }
            }
        }
        FieldShape::Volume { .. } => {
            let offsets = offsets_3d(params.seed, params.octaves);
            for z in 0..depth {
                for y in 0..height {
                    for x in 0..width {
                        raw.push(height_3d(
                            noise,
                            params,
                            &offsets,
                            (x, y, z),
                            (width, height, depth),
                        ));
                    }
                }
            }
        }
    }

    if let Some(bad) = raw.iter().position(|v| !v.is_finite()) {
        return Err(NoiseError::InvalidArgument(format!(
            "octave accumulation overflowed at cell {bad} (persistence {}, lacunarity {}, {} octaves)",
            params.persistence, params.lacunarity, params.octaves
        )));
    }

    let (min, max) = raw
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if min == max {
        tracing::warn!("Noise field is flat (value {min}), normalizing to zero");
    }
    tracing::debug!(
        ?shape,
        octaves = params.octaves,
        seed = params.seed,
        min,
        max,
        "Generated noise field"
    );

    Ok(ScalarField::normalize(shape, &raw, min, max))
}

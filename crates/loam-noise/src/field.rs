//! Dense scalar fields: the normalized output of noise generation.
//!
//! Cells are stored row-major with `x` varying fastest, then `y`, then `z`.

use serde::{Deserialize, Serialize};

use crate::error::NoiseError;

/// Extents of a 2D or 3D scalar field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldShape {
    /// A `width × height` heightmap.
    Flat { width: usize, height: usize },
    /// A `width × height × depth` volume.
    Volume {
        width: usize,
        height: usize,
        depth: usize,
    },
}

impl FieldShape {
    /// Create a validated 2D shape.
    pub fn flat(width: usize, height: usize) -> Result<Self, NoiseError> {
        let shape = Self::Flat { width, height };
        shape.validate()?;
        Ok(shape)
    }

    /// Create a validated 3D shape.
    pub fn volume(width: usize, height: usize, depth: usize) -> Result<Self, NoiseError> {
        let shape = Self::Volume {
            width,
            height,
            depth,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Build a shape from a list of extents. Exactly two or three are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::InvalidArgument`] for any other rank or for a zero extent.
    pub fn from_dims(dims: &[usize]) -> Result<Self, NoiseError> {
        match *dims {
            [width, height] => Self::flat(width, height),
            [width, height, depth] => Self::volume(width, height, depth),
            _ => Err(NoiseError::InvalidArgument(format!(
                "unsupported dimensionality {} (expected 2 or 3 extents)",
                dims.len()
            ))),
        }
    }

    /// Reject zero extents.
    pub fn validate(&self) -> Result<(), NoiseError> {
        let (w, h, d) = self.extents();
        if w == 0 || h == 0 || d == 0 {
            return Err(NoiseError::InvalidArgument(format!(
                "field dimensions must be positive, got {w}x{h}x{d}"
            )));
        }
        Ok(())
    }

    /// Returns `(width, height, depth)`; depth is 1 for flat fields.
    pub fn extents(&self) -> (usize, usize, usize) {
        match *self {
            Self::Flat { width, height } => (width, height, 1),
            Self::Volume {
                width,
                height,
                depth,
            } => (width, height, depth),
        }
    }

    pub fn width(&self) -> usize {
        self.extents().0
    }

    pub fn height(&self) -> usize {
        self.extents().1
    }

    pub fn depth(&self) -> usize {
        self.extents().2
    }

    /// 2 for flat fields, 3 for volumes.
    pub fn rank(&self) -> usize {
        match self {
            Self::Flat { .. } => 2,
            Self::Volume { .. } => 3,
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        let (w, h, d) = self.extents();
        w * h * d
    }

    /// Returns `true` if the shape has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear index of cell `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let (w, h, _) = self.extents();
        x + y * w + z * w * h
    }
}

/// Inverse linear interpolation clamped to `[0, 1]`.
///
/// Returns 0 when `a == b`, so a flat field normalizes to all zeros.
#[inline]
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// A dense, normalized scalar field.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    shape: FieldShape,
    values: Vec<f32>,
}

impl ScalarField {
    /// Wrap existing cell values.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::InvalidArgument`] if the shape is invalid or the
    /// number of values does not match it.
    pub fn from_values(shape: FieldShape, values: Vec<f32>) -> Result<Self, NoiseError> {
        shape.validate()?;
        if values.len() != shape.len() {
            return Err(NoiseError::InvalidArgument(format!(
                "expected {} values for {:?}, got {}",
                shape.len(),
                shape,
                values.len()
            )));
        }
        Ok(Self { shape, values })
    }

    /// Remap raw accumulated noise into `[0, 1]` using the observed extremes.
    pub(crate) fn normalize(shape: FieldShape, raw: &[f64], min: f64, max: f64) -> Self {
        let values = raw
            .iter()
            .map(|&v| inverse_lerp(min, max, v) as f32)
            .collect();
        Self { shape, values }
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn width(&self) -> usize {
        self.shape.width()
    }

    pub fn height(&self) -> usize {
        self.shape.height()
    }

    pub fn depth(&self) -> usize {
        self.shape.depth()
    }

    /// Value at `(x, y)` on the first layer.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.get3(x, y, 0)
    }

    /// Value at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of range.
    #[inline]
    pub fn get3(&self, x: usize, y: usize, z: usize) -> f32 {
        self.values[self.shape.index(x, y, z)]
    }

    /// All cells, row-major.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// One row of `width` cells.
    pub fn row(&self, y: usize, z: usize) -> &[f32] {
        let start = self.shape.index(0, y, z);
        &self.values[start..start + self.width()]
    }

    pub fn min(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Returns `true` if every cell is finite and inside `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        self.values
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

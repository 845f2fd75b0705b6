//! RGBA8 texture buffers built from color maps and height fields.
//!
//! Pixels follow the field layout: row `y` of the field is pixel row `y`.
//! Upload, filtering, and material binding are left to the renderer.

use std::path::Path;

use loam_noise::{FieldShape, ScalarField};

use crate::color::Color;
use crate::error::TerrainError;
use crate::region::ColorMap;

/// A 2D texture stored as row-major RGBA8 pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture2D {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

/// Number of cells in a `dims` grid, or an error if it does not fit in memory.
fn cell_count(dims: &[u32]) -> Result<usize, TerrainError> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
        .and_then(|cells| cells.checked_mul(4).map(|_| cells))
        .ok_or_else(|| {
            TerrainError::PreconditionViolation(format!("texture of {dims:?} pixels is too large"))
        })
}

fn check_len(dims: &[u32], given: usize) -> Result<(), TerrainError> {
    let expected = cell_count(dims)?;
    if expected != given {
        return Err(TerrainError::PreconditionViolation(format!(
            "{given} cells do not fill a {dims:?} texture ({expected} needed)"
        )));
    }
    Ok(())
}

fn grayscale(heights: &[f32]) -> Vec<Color> {
    heights
        .iter()
        .map(|&h| Color::lerp(Color::BLACK, Color::WHITE, h))
        .collect()
}

impl Texture2D {
    /// Build a texture from `width * height` colors in row-major order.
    ///
    /// # Errors
    ///
    /// [`TerrainError::PreconditionViolation`] if `colors` does not hold
    /// exactly one color per pixel.
    pub fn from_colors(width: u32, height: u32, colors: &[Color]) -> Result<Self, TerrainError> {
        check_len(&[width, height], colors.len())?;
        Ok(Self {
            width,
            height,
            pixels: colors.iter().flat_map(|c| c.to_rgba8()).collect(),
        })
    }

    /// Grayscale texture: each cell lerps from black at 0 to white at 1.
    pub fn from_heights(width: u32, height: u32, heights: &[f32]) -> Result<Self, TerrainError> {
        Self::from_colors(width, height, &grayscale(heights))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Convert to an `image` buffer.
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<(), TerrainError> {
        let image = self.to_image().ok_or_else(|| {
            TerrainError::PreconditionViolation(format!(
                "pixel buffer of {} bytes does not match {}x{}",
                self.pixels.len(),
                self.width,
                self.height
            ))
        })?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        tracing::debug!("Wrote {}x{} texture to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// A stack of equally sized RGBA8 layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture3D {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Layer-major pixel data. Length = `width * height * depth * 4`.
    pub pixels: Vec<u8>,
}

impl Texture3D {
    pub fn from_colors(
        width: u32,
        height: u32,
        depth: u32,
        colors: &[Color],
    ) -> Result<Self, TerrainError> {
        check_len(&[width, height, depth], colors.len())?;
        Ok(Self {
            width,
            height,
            depth,
            pixels: colors.iter().flat_map(|c| c.to_rgba8()).collect(),
        })
    }

    pub fn from_heights(
        width: u32,
        height: u32,
        depth: u32,
        heights: &[f32],
    ) -> Result<Self, TerrainError> {
        Self::from_colors(width, height, depth, &grayscale(heights))
    }

    /// Copy out one layer, or `None` if `z >= depth`.
    pub fn layer(&self, z: u32) -> Option<Texture2D> {
        let layer_len = self.width as usize * self.height as usize * 4;
        let start = z as usize * layer_len;
        let pixels = self.pixels.get(start..start + layer_len)?;
        Some(Texture2D {
            width: self.width,
            height: self.height,
            pixels: pixels.to_vec(),
        })
    }
}

/// A texture matching the dimensionality of its source.
#[derive(Clone, Debug, PartialEq)]
pub enum MapTexture {
    Flat(Texture2D),
    Volume(Texture3D),
}

fn extent(value: usize, axis: &str) -> Result<u32, TerrainError> {
    u32::try_from(value).map_err(|_| {
        TerrainError::PreconditionViolation(format!(
            "texture {axis} of {value} exceeds the u32 pixel range"
        ))
    })
}

impl MapTexture {
    /// Texture of the region colors.
    pub fn from_color_map(map: &ColorMap) -> Result<Self, TerrainError> {
        Self::build(map.shape(), map.colors().to_vec())
    }

    /// Grayscale texture of the field values.
    pub fn from_field(field: &ScalarField) -> Result<Self, TerrainError> {
        Self::build(field.shape(), grayscale(field.values()))
    }

    fn build(shape: FieldShape, colors: Vec<Color>) -> Result<Self, TerrainError> {
        let (w, h, d) = shape.extents();
        let (w, h) = (extent(w, "width")?, extent(h, "height")?);
        match shape {
            FieldShape::Flat { .. } => Ok(Self::Flat(Texture2D::from_colors(w, h, &colors)?)),
            FieldShape::Volume { .. } => {
                let d = extent(d, "depth")?;
                Ok(Self::Volume(Texture3D::from_colors(w, h, d, &colors)?))
            }
        }
    }

    /// The flat texture, or the middle layer of a volume.
    pub fn preview(&self) -> Result<Texture2D, TerrainError> {
        match self {
            Self::Flat(texture) => Ok(texture.clone()),
            Self::Volume(texture) => texture.layer(texture.depth / 2).ok_or_else(|| {
                TerrainError::PreconditionViolation("volume texture has no layers".to_string())
            }),
        }
    }
}

//! Height bands and per-cell color classification.

use loam_config::RegionConfig;
use loam_noise::{FieldShape, ScalarField};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A named height band mapped to a display color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainRegion {
    pub name: String,
    pub min_height: f32,
    pub max_height: f32,
    pub color: Color,
}

/// Comparison operators for [`TerrainRegion::compare_width`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

/// Float equality tolerant of rounding, scaled to the operands' magnitude.
pub fn approximately(a: f32, b: f32) -> bool {
    let tolerance = (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0);
    (b - a).abs() < tolerance
}

impl TerrainRegion {
    pub fn new(name: impl Into<String>, min_height: f32, max_height: f32, color: Color) -> Self {
        Self {
            name: name.into(),
            min_height,
            max_height,
            color,
        }
    }

    /// Returns `true` if `height` lies in `[min_height, max_height]`.
    #[inline]
    pub fn contains(&self, height: f32) -> bool {
        height >= self.min_height && height <= self.max_height
    }

    /// Extent of the band.
    pub fn band_width(&self) -> f32 {
        self.max_height - self.min_height
    }

    /// Compare the band width against `width`.
    pub fn compare_width(&self, comparison: Comparison, width: f32) -> bool {
        let own = self.band_width();
        match comparison {
            Comparison::Equal => approximately(own, width),
            Comparison::NotEqual => !approximately(own, width),
            Comparison::Greater => own > width,
            Comparison::GreaterOrEqual => own >= width,
            Comparison::Less => own < width,
            Comparison::LessOrEqual => own <= width,
        }
    }
}

impl From<&RegionConfig> for TerrainRegion {
    fn from(config: &RegionConfig) -> Self {
        Self::new(
            config.name.clone(),
            config.min_height,
            config.max_height,
            Color::from(config.color),
        )
    }
}

/// Color of the first region containing `height`, or transparent if none does.
///
/// Regions are scanned in order; overlapping bands resolve to the earlier one.
pub fn classify(height: f32, regions: &[TerrainRegion]) -> Color {
    regions
        .iter()
        .find(|region| region.contains(height))
        .map_or(Color::TRANSPARENT, |region| region.color)
}

/// Per-cell colors laid out like the field they were classified from.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMap {
    shape: FieldShape,
    colors: Vec<Color>,
}

impl ColorMap {
    pub(crate) fn from_parts(shape: FieldShape, colors: Vec<Color>) -> Self {
        debug_assert_eq!(shape.len(), colors.len());
        Self { shape, colors }
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of range.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Color {
        self.colors[self.shape.index(x, y, z)]
    }

    /// Number of cells no region claimed.
    pub fn unclassified_count(&self) -> usize {
        self.colors
            .iter()
            .filter(|&&c| c == Color::TRANSPARENT)
            .count()
    }
}

/// Classify every cell of `field`.
pub fn classify_field(field: &ScalarField, regions: &[TerrainRegion]) -> ColorMap {
    let colors = classify_values(field.values(), regions);
    ColorMap::from_parts(field.shape(), colors)
}

pub(crate) fn classify_values(values: &[f32], regions: &[TerrainRegion]) -> Vec<Color> {
    values.iter().map(|&h| classify(h, regions)).collect()
}

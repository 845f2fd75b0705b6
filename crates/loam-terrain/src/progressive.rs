//! Row-by-row map classification for interactive generation.
//!
//! A heightmap advances one `y` row per step; a volume advances one `z` layer.
//! The colors produced so far are always a valid prefix of the finished map.

use loam_noise::{FieldShape, ScalarField};
use tracing::{debug, trace};

use crate::color::Color;
use crate::error::TerrainError;
use crate::generator::{GeneratedMap, MapGenerator, log_summary};
use crate::region::{ColorMap, classify_values};

/// Colors of one processed row (or volume layer).
#[derive(Clone, Debug, PartialEq)]
pub struct RowSlice {
    /// Row index for heightmaps, layer index for volumes.
    pub index: usize,
    /// Number of slices in the map.
    pub total: usize,
    pub colors: Vec<Color>,
}

impl RowSlice {
    /// Whether this is the last slice of the map.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// Lazy, finite sequence of [`RowSlice`]s over a generated field.
///
/// Returned by [`MapGenerator::generate_progressive`]. Stop iterating to
/// cancel; call [`finish`](Self::finish) to complete the remaining rows and
/// build the mesh.
pub struct ProgressiveMap<'g> {
    generator: &'g MapGenerator,
    field: ScalarField,
    colors: Vec<Color>,
    slice_len: usize,
    next_slice: usize,
}

impl<'g> ProgressiveMap<'g> {
    pub(crate) fn new(generator: &'g MapGenerator, field: ScalarField) -> Self {
        let (width, height, _) = field.shape().extents();
        let slice_len = match field.shape() {
            FieldShape::Flat { .. } => width,
            FieldShape::Volume { .. } => width * height,
        };
        debug!(
            "Progressive generation of {} slices of {} cells",
            field.values().len() / slice_len,
            slice_len
        );
        Self {
            generator,
            colors: Vec::with_capacity(field.values().len()),
            field,
            slice_len,
            next_slice: 0,
        }
    }

    /// The normalized field being classified.
    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    /// Colors of every slice processed so far, in field order.
    pub fn colors_so_far(&self) -> &[Color] {
        &self.colors
    }

    pub fn total_rows(&self) -> usize {
        self.field.values().len() / self.slice_len
    }

    pub fn completed_rows(&self) -> usize {
        self.next_slice
    }

    /// Classify the remaining slices and build the mesh.
    pub fn finish(mut self) -> Result<GeneratedMap, TerrainError> {
        while self.next().is_some() {}

        let mesh = self.generator.build_mesh(Some(&self.field))?;
        let colors = ColorMap::from_parts(self.field.shape(), self.colors);
        log_summary(&self.field, &colors, &mesh);
        Ok(GeneratedMap {
            field: self.field,
            colors,
            mesh,
        })
    }
}

impl Iterator for ProgressiveMap<'_> {
    type Item = RowSlice;

    fn next(&mut self) -> Option<RowSlice> {
        let total = self.total_rows();
        if self.next_slice >= total {
            return None;
        }
        let start = self.next_slice * self.slice_len;
        let cells = &self.field.values()[start..start + self.slice_len];
        let colors = classify_values(cells, &self.generator.settings().regions);
        self.colors.extend_from_slice(&colors);

        let index = self.next_slice;
        self.next_slice += 1;
        trace!("Classified slice {}/{}", self.next_slice, total);

        Some(RowSlice {
            index,
            total,
            colors,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_rows() - self.next_slice;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgressiveMap<'_> {}

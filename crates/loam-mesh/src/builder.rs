//! Grid triangulation of scalar fields with level-of-detail decimation.
//!
//! Every sampled grid point becomes exactly one vertex. Each interior quad of
//! the sampled grid contributes two triangles with a fixed winding:
//! `{i, i+stride+1, i+stride}` and `{i+stride+1, i, i+1}`.
//!
//! [`MeshRows`] builds the mesh one sampled row at a time so callers can spread
//! the work across frames; [`build`] drives it to completion in one call.
//! Both produce identical buffers.

use loam_noise::{FieldShape, ScalarField};

use crate::buffers::MeshBuffers;
use crate::curve::HeightCurve;
use crate::error::MeshError;
use crate::lod::LevelOfDetail;

/// Progress report emitted after each sampled row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowProgress {
    /// Sampled layer index (0 for heightmaps).
    pub layer: usize,
    /// Sampled row index within the layer.
    pub row: usize,
    /// Rows finished so far, including this one.
    pub completed: usize,
    /// Total rows in the mesh.
    pub total: usize,
}

/// Incremental mesh builder: an iterator yielding one [`RowProgress`] per
/// sampled row.
///
/// The buffers built so far are always consistent: a quad is emitted only once
/// both of its rows exist, so every index refers to an emitted vertex. The
/// final index order matches a single row-major pass over the quads.
pub struct MeshRows<'a, C: HeightCurve + ?Sized> {
    field: &'a ScalarField,
    curve: &'a C,
    height_scale: f32,
    increment: usize,
    columns: usize,
    rows: usize,
    layers: usize,
    volumetric: bool,
    offsets: [f32; 3],
    next_row: usize,
    buffers: MeshBuffers,
}

impl<'a, C: HeightCurve + ?Sized> MeshRows<'a, C> {
    /// Prepare an incremental build.
    ///
    /// # Errors
    ///
    /// - [`MeshError::PreconditionViolation`] if the field holds values that
    ///   are non-finite or outside `[0, 1]`.
    /// - [`MeshError::InvalidArgument`] if the sampled grid needs more than
    ///   `u32::MAX` vertices.
    pub fn new(
        field: &'a ScalarField,
        height_scale: f32,
        curve: &'a C,
        lod: LevelOfDetail,
    ) -> Result<Self, MeshError> {
        if !field.is_normalized() {
            return Err(MeshError::PreconditionViolation(
                "field is not normalized to [0, 1]".to_string(),
            ));
        }

        let (width, height, depth) = field.shape().extents();
        let volumetric = matches!(field.shape(), FieldShape::Volume { .. });
        let columns = lod.sampled_count(width);
        let rows = lod.sampled_count(height);
        let layers = lod.sampled_count(depth);

        let vertex_count = columns * rows * layers;
        if vertex_count > u32::MAX as usize {
            return Err(MeshError::InvalidArgument(format!(
                "{vertex_count} vertices exceed the 32-bit index range"
            )));
        }

        let quad_layers = if volumetric {
            layers.saturating_sub(1)
        } else {
            1
        };
        let index_count =
            6 * columns.saturating_sub(1) * rows.saturating_sub(1) * quad_layers;

        Ok(Self {
            field,
            curve,
            height_scale,
            increment: lod.increment(),
            columns,
            rows,
            layers,
            volumetric,
            offsets: [
                (width - 1) as f32 / -2.0,
                (height - 1) as f32 / -2.0,
                (depth - 1) as f32 / -2.0,
            ],
            next_row: 0,
            buffers: MeshBuffers::with_grid(columns, rows, layers, index_count),
        })
    }

    /// Total number of sampled rows across all layers.
    pub fn total_rows(&self) -> usize {
        self.rows * self.layers
    }

    pub fn is_complete(&self) -> bool {
        self.next_row >= self.total_rows()
    }

    /// The mesh built so far.
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// Process any remaining rows and return the finished mesh.
    pub fn finish(mut self) -> MeshBuffers {
        while self.next().is_some() {}
        self.buffers
    }

    fn emit_row(&mut self, layer: usize, row: usize) {
        let (width, height, _) = self.field.shape().extents();
        let y = row * self.increment;
        let z = layer * self.increment;
        let [off_x, off_y, off_z] = self.offsets;

        // Heightmap rows (or volume layers) advance along -z.
        let forward = if self.volumetric {
            -(z as f32 + off_z)
        } else {
            -(y as f32 + off_y)
        };

        for sx in 0..self.columns {
            let x = sx * self.increment;
            let value = self.field.get3(x, y, z);
            let elevation = self.curve.evaluate(value) * self.height_scale;
            self.buffers.push_vertex(
                [x as f32 + off_x, elevation, forward],
                [x as f32 / width as f32, y as f32 / height as f32],
            );
        }

        let layer_has_quads = !self.volumetric || layer + 1 < self.layers;
        if row > 0 && layer_has_quads {
            let stride = self.columns as u32;
            let start = ((layer * self.rows + row - 1) * self.columns) as u32;
            for sx in 0..self.columns.saturating_sub(1) {
                let i = start + sx as u32;
                self.buffers.push_triangle(i, i + stride + 1, i + stride);
                self.buffers.push_triangle(i + stride + 1, i, i + 1);
            }
        }
    }
}

impl<C: HeightCurve + ?Sized> Iterator for MeshRows<'_, C> {
    type Item = RowProgress;

    fn next(&mut self) -> Option<RowProgress> {
        if self.is_complete() {
            return None;
        }
        let layer = self.next_row / self.rows;
        let row = self.next_row % self.rows;
        self.emit_row(layer, row);
        self.next_row += 1;

        Some(RowProgress {
            layer,
            row,
            completed: self.next_row,
            total: self.total_rows(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_rows().saturating_sub(self.next_row);
        (remaining, Some(remaining))
    }
}

/// Build the complete mesh for a field in one call.
///
/// # Errors
///
/// See [`MeshRows::new`].
pub fn build<C: HeightCurve + ?Sized>(
    field: &ScalarField,
    height_scale: f32,
    curve: &C,
    lod: LevelOfDetail,
) -> Result<MeshBuffers, MeshError> {
    let mesh = MeshRows::new(field, height_scale, curve, lod)?.finish();
    tracing::debug!(
        lod = lod.level(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Built terrain mesh"
    );
    Ok(mesh)
}

//! Terrain mesh data: flat vertex, UV, and triangle index buffers.

use glam::Vec3;

/// The output of a terrain meshing pass, ready for upload by a renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions, one per sampled grid point.
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates, parallel to `vertices`.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, 3 indices per triangle.
    pub indices: Vec<u32>,
    /// Sampled vertices per row.
    pub width: usize,
    /// Sampled rows per layer.
    pub height: usize,
    /// Sampled layers (1 for heightmaps).
    pub depth: usize,
}

impl MeshBuffers {
    /// Creates an empty mesh with room for the given sampled grid.
    pub fn with_grid(width: usize, height: usize, depth: usize, index_count: usize) -> Self {
        let vertex_count = width * height * depth;
        Self {
            vertices: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
            width,
            height,
            depth,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub(crate) fn push_vertex(&mut self, position: [f32; 3], uv: [f32; 2]) {
        self.vertices.push(position);
        self.uvs.push(uv);
    }

    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Smooth per-vertex normals, area-weighted over adjacent triangles.
    ///
    /// Vertices not referenced by any triangle get a zero normal.
    pub fn compute_normals(&self) -> Vec<[f32; 3]> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.vertices[a]);
            let pb = Vec3::from_array(self.vertices[b]);
            let pc = Vec3::from_array(self.vertices[c]);
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        normals
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect()
    }

    /// Axis-aligned bounds `(min, max)` of the vertex positions.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from_array(*v));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some((min.to_array(), max.to_array()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshBuffers::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_single_triangle_normal_points_along_cross_product() {
        let mut mesh = MeshBuffers::with_grid(3, 1, 1, 3);
        mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0]);
        mesh.push_vertex([1.0, 0.0, -1.0], [1.0, 0.0]);
        mesh.push_vertex([0.0, 0.0, -1.0], [0.0, 1.0]);
        mesh.push_triangle(0, 1, 2);

        for n in mesh.compute_normals() {
            assert!((Vec3::from_array(n) - Vec3::Y).length() < 1e-6, "Normal {n:?}");
        }
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_unreferenced_vertex_has_zero_normal() {
        let mut mesh = MeshBuffers::default();
        mesh.push_vertex([5.0, 5.0, 5.0], [0.0, 0.0]);
        assert_eq!(mesh.compute_normals(), vec![[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_bounds() {
        let mut mesh = MeshBuffers::default();
        mesh.push_vertex([-1.0, 2.0, 3.0], [0.0, 0.0]);
        mesh.push_vertex([4.0, -5.0, 0.5], [0.0, 0.0]);
        assert_eq!(mesh.bounds(), Some(([-1.0, -5.0, 0.5], [4.0, 2.0, 3.0])));
    }
}

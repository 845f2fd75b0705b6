//! Terrain map generation for the loam toolkit.
//!
//! Ties the noise and mesh crates together: a [`MapGenerator`] produces a
//! normalized [`ScalarField`](loam_noise::ScalarField), classifies every cell
//! into a [`TerrainRegion`] color, and triangulates the field into
//! [`MeshBuffers`](loam_mesh::MeshBuffers). Runs are either eager
//! ([`MapGenerator::generate`]) or row by row
//! ([`MapGenerator::generate_progressive`]).
//!
//! Rendering, texture upload, and prefab placement belong to the caller.
//! The [`texture`] module only prepares RGBA8 buffers and can save them as PNG.

mod color;
mod error;
mod generator;
mod progressive;
mod region;
pub mod texture;

pub use color::Color;
pub use error::TerrainError;
pub use generator::{DynCurve, GeneratedMap, MapGenerator, MapSettings};
pub use progressive::{ProgressiveMap, RowSlice};
pub use region::{ColorMap, Comparison, TerrainRegion, approximately, classify, classify_field};
pub use texture::{MapTexture, Texture2D, Texture3D};

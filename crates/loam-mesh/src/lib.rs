//! Terrain meshing: scalar fields to flat vertex/UV/index buffers with LOD decimation.

pub mod buffers;
pub mod builder;
pub mod curve;
pub mod error;
pub mod lod;

pub use buffers::MeshBuffers;
pub use builder::{MeshRows, RowProgress, build};
pub use curve::{HeightCurve, Keyframe, KeyframeCurve, Linear};
pub use error::MeshError;
pub use lod::LevelOfDetail;

//! Terrain pipeline error types.

use loam_config::ConfigError;
use loam_mesh::MeshError;
use loam_noise::NoiseError;

/// Errors surfaced by map generation.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// Noise field generation rejected its inputs.
    #[error(transparent)]
    Noise(#[from] NoiseError),

    /// Mesh building rejected its inputs.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Settings could not be loaded or are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operation was requested before its input exists.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// A texture could not be encoded or written.
    #[error("failed to write texture: {0}")]
    Image(#[from] image::ImageError),

    /// An output directory could not be created.
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),
}

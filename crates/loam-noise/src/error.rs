//! Noise generation error types.

/// Errors that can occur when generating a scalar field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoiseError {
    /// A dimension was zero, or the requested dimensionality is neither 2D nor 3D.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

//! Mesh building error types.

/// Errors that can occur when building a terrain mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A parameter was outside its supported range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input field is missing or not a valid normalized field.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

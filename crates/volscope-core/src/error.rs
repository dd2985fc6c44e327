//! Error types for volscope.

use thiserror::Error;

/// The main error type for volscope operations.
#[derive(Error, Debug)]
pub enum VolscopeError {
    /// The requested voxel resolution cannot produce a volume.
    #[error("invalid voxel resolution {0}: must be between 1 and 2048")]
    InvalidResolution(u32),

    /// The bleed radius is negative or not finite.
    #[error("invalid bleed radius {0}: must be finite and non-negative")]
    InvalidBleedRadius(f32),

    /// A grid transform matrix has no inverse.
    #[error("grid transform is not invertible")]
    SingularTransform,

    /// Voxelization was cancelled through its cancel token.
    #[error("voxelization cancelled")]
    Cancelled,

    /// A grid with the given name was not found in the asset.
    #[error("grid '{0}' not found")]
    GridNotFound(String),

    /// A background worker panicked before producing a result.
    #[error("voxelization worker panicked")]
    WorkerPanicked,

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for volscope operations.
pub type Result<T> = std::result::Result<T, VolscopeError>;

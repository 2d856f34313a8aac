//! Type-level error definitions

use thiserror::Error;

/// Errors raised while building, validating or decoding grid types
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("Invalid deployment: {0}")]
    InvalidDeployment(String),

    #[error("Workload type {expected} expected, got {actual}")]
    WorkloadTypeMismatch { expected: String, actual: String },

    #[error("Workload type {0} has no typed payload")]
    UnsupportedWorkloadType(String),

    #[error("Invalid identity seed: {0}")]
    InvalidSeed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for type-level operations
pub type Result<T> = std::result::Result<T, TypesError>;

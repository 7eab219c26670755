//! Error types for the MIP layer.

use thiserror::Error;

/// Errors that abort MIP setup.
///
/// A failed relaxation solve inside a running search never surfaces here:
/// the orchestrators catch it and fathom the affected node or iteration.
#[derive(Error, Debug)]
pub enum MipError {
    /// Problem validation failed.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
}

/// Result type for MIP operations.
pub type MipResult<T> = Result<T, MipError>;

//! Error types for the simplex engine.

use thiserror::Error;

/// Errors that abort a solve call outright.
///
/// Everything else (infeasibility, unboundedness, iteration limits) is a
/// regular outcome surfaced through [`crate::SolveStatus`]. Pivot elements
/// are guarded by a fixed epsilon, so no numeric operation inside the
/// tableau can fail after validation passes.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Model validation failed (dimension mismatch, empty objective,
    /// non-finite entries).
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

/// Result type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

use thiserror::Error;

/// Errors surfaced to the caller.
///
/// Only environmental failures live here. Missing documents, lines that do
/// not match the task grammar, and unresolvable date phrases are all
/// recovered locally (empty list, skip, unset field) and never become errors.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TaskError>;

// Typed errors with thiserror. Only construction and the JSON boundary can fail;
// interaction paths resolve to no-ops instead of errors.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum FlipbookError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("A flipbook needs at least one item")]
    EmptySequence,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FlipbookError {
    fn from(err: serde_json::Error) -> Self {
        FlipbookError::Serialization(err.to_string())
    }
}

//! Embedding service error kind (§7).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("embedding server unreachable: {0}")]
    Connect(String),

    #[error("embedding server returned an error status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("could not parse embedding server response: {0}")]
    Decode(String),

    #[error("embedding server returned {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

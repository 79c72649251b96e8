//! Recommendation engine error kind (§7).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("graph store error: {0}")]
    Graph(#[from] wr_graph::GraphError),

    #[error("embedding service error: {0}")]
    Embedding(#[from] wr_embedding::EmbeddingError),

    #[error("no candidates available")]
    NoCandidates,
}

pub type RecommendResult<T> = Result<T, RecommendError>;

//! Graph store error kinds (§7: `TransientStoreError`, `NoCandidatesError`).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("failed to connect to the graph store: {0}")]
    Connect(String),

    #[error("graph query failed: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("graph store is unreachable after retries: {0}")]
    Transient(String),

    #[error("missing expected field '{0}' on returned row")]
    MissingField(String),

    #[error("vector index '{0}' is not present")]
    MissingIndex(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

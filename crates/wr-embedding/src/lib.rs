//! Sentence-embedding client and text enrichment (C2).

pub mod client;
pub mod enrich;
pub mod error;

pub use client::{EmbeddingClient, EmbeddingConfig, DEFAULT_EMBEDDING_URL, DEFAULT_MODEL};
pub use error::{EmbeddingError, EmbeddingResult};

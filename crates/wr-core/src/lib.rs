//! Shared domain model, vocabulary, and error types for the welding
//! equipment recommender.
//!
//! This crate owns only data and pure functions — it never talks to the
//! graph store, the embedding service, or an LLM. Those live in
//! `wr-graph`, `wr-embedding`, `wr-intent`, and friends, all of which
//! depend on the types defined here.

pub mod error;
pub mod model;
pub mod vocabulary;

pub use error::{CoreError, CoreResult, StageError, StageResult};
pub use model::{
    Category, CoOccurrenceEdge, CompatibilityEdge, Customer, GoldenPackage, Product, RuleKind,
    Transaction, Trinity, EMBEDDING_DIM,
};
pub use vocabulary::DomainVocabulary;

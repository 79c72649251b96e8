//! Response Composer (C7): business re-ranking, mode-aware explanation
//! generation, response formatting, back-translation, and the
//! satisfaction/confidence telemetry attached to every response.
//!
//! Composition is infallible by design: a stage that finds nothing still
//! produces a response carrying a clarifying follow-up question, so the
//! orchestrator never has to treat "no recommendations" as an error.

pub mod composer;
pub mod explanation;
pub mod formatting;
pub mod rerank;
pub mod satisfaction;
pub mod types;

pub use composer::compose;
pub use types::{ComposedResponse, ExplanationLevel};

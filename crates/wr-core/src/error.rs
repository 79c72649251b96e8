//! Centralized error kinds (§7).
//!
//! These map to the error kinds named in the specification rather than to
//! any one crate's failure modes — `StageError` in particular is the shape
//! the orchestrator (C8) composes out of every stage's own error type.

use thiserror::Error;

/// Errors raised by `wr-core` itself (vocabulary loading, validation).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Error kinds shared across stages (§7). Each downstream crate defines its
/// own `thiserror` enum and converts into these via `#[from]` at the
/// orchestrator boundary, following the teacher's `CwaError` composition.
#[derive(Error, Debug)]
pub enum StageError {
    /// Startup-only; always fatal, never surfaced mid-request.
    #[error("configuration error: {0}")]
    Config(String),

    /// Retried with exponential backoff up to 3 attempts by the caller;
    /// once retries are exhausted it is wrapped as `StageError::Stage`.
    #[error("transient store error: {0}")]
    TransientStore(String),

    /// LLM timeout or failure. Never retried inside a stage; the caller
    /// degrades to a regex-pattern fallback instead.
    #[error("LLM error: {0}")]
    Llm(String),

    /// No usable candidates were found; triggers the next fallback in the
    /// chain rather than being surfaced to the caller.
    #[error("no candidates available")]
    NoCandidates,

    /// A stage failed outright after exhausting its own fallbacks. The
    /// orchestrator converts this into a composed error response.
    #[error("stage error: {0}")]
    Stage(String),
}

pub type StageResult<T> = Result<T, StageError>;

//! Intent Processor (C5): language detection, expertise-mode
//! classification, deterministic product matching, and LLM-driven
//! structured intent extraction with a regex fallback.

pub mod error;
pub mod expertise;
pub mod extraction;
pub mod language;
pub mod llm;
pub mod processor;
pub mod product_match;
pub mod types;

pub use error::{IntentError, IntentResult};
pub use llm::{LlmClient, LlmConfig};
pub use processor::IntentProcessor;
pub use types::{ExpertiseMode, Language, MentionedProduct, ProcessedIntent, UserContext};

//! Intent processor error kind (§4.5 Errors, §7).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntentError {
    #[error("missing domain vocabulary configuration: {0}")]
    Config(String),

    #[error("LLM call failed: {0}")]
    Llm(String),

    #[error("LLM response could not be parsed as JSON: {0}")]
    LlmParse(String),
}

pub type IntentResult<T> = Result<T, IntentError>;

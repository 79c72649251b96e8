//! LLM-driven structured intent extraction (§4.5 step 5).
//!
//! HTTP transport and provider-endpoint resolution follow the
//! OpenAI-compatible chat-completion pattern, provider-qualified model
//! names and all; the tolerant JSON recovery (`parse_json_safely`) is
//! ported from `simple_intent_agent.py::extract_clean_json`.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use wr_core::DomainVocabulary;

use crate::error::{IntentError, IntentResult};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: None,
            timeout_secs: 20,
        }
    }
}

#[derive(Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }

    fn endpoint(&self) -> String {
        self.config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    /// Sends a system + user message pair and returns the raw assistant
    /// content. Does not retry; `extract_intent` owns retry semantics.
    async fn complete(&self, system: &str, user: &str) -> IntentResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| IntentError::Llm("no API key configured for intent extraction".into()))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: 0.2,
            max_tokens: 512,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| IntentError::Llm(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IntentError::Llm(format!("status {status}: {body}")));
        }

        let body: Value =
            response.json().await.map_err(|e| IntentError::Llm(format!("bad response body: {e}")))?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| IntentError::Llm("response missing choices[0].message.content".into()))
    }

    /// Builds the system prompt listing valid processes/materials/industries
    /// and runs structured extraction, retrying once on parse failure with a
    /// stricter follow-up instruction (§4.5 step 5).
    pub async fn extract_intent(&self, query: &str, vocabulary: &DomainVocabulary) -> IntentResult<Value> {
        let system = build_system_prompt(vocabulary);
        let user = format!("Extract welding requirements from this query:\n\n{query}");

        let raw = self.complete(&system, &user).await?;
        if let Some(parsed) = parse_json_safely(&raw) {
            return Ok(parsed);
        }

        warn!("first LLM extraction response was not valid JSON, retrying once");
        let retry_user = format!(
            "{user}\n\nYour previous response could not be parsed as JSON. \
             Respond with ONLY a single valid JSON object, no commentary, no code fences."
        );
        let retry_raw = self.complete(&system, &retry_user).await?;
        parse_json_safely(&retry_raw)
            .ok_or_else(|| IntentError::LlmParse(format!("unparseable after retry: {retry_raw}")))
    }

    /// Asks the LLM to map a single unrecognized process string onto the
    /// known enum (§4.5 step 6). Returns `None` if it still can't resolve.
    pub async fn remap_process(&self, process: &str, vocabulary: &DomainVocabulary) -> Option<String> {
        let valid = vocabulary.all_processes().join(", ");
        let system = format!(
            "You map welding process names to a fixed enum. Valid values: {valid}. \
             Respond with only the single matching value, or the word NONE if there is no match."
        );
        let user = format!("Process name: {process}");

        let response = self.complete(&system, &user).await.ok()?;
        let candidate = response.trim().trim_matches('"').to_uppercase();
        if candidate == "NONE" {
            return None;
        }
        vocabulary.normalize_process(&candidate)
    }
}

fn build_system_prompt(vocabulary: &DomainVocabulary) -> String {
    let processes = vocabulary.all_processes().join(", ");
    let materials = vocabulary.materials().join(", ");
    let industries = vocabulary.industries().join(", ");

    format!(
        "You are a welding-equipment intent extractor. Given a user query, extract a JSON \
         object with these fields: processes (array of strings from {{{processes}}}), \
         material (one of {{{materials}}} or null), power_watts (number or null), \
         current_amps (number or null), voltage (number or null), thickness_mm (number or \
         null), environment (string or null), application (string or null), industry (one \
         of {{{industries}}} or null), confidence (0.0-1.0), completeness (0.0-1.0), \
         missing_params (array of strings naming required-but-absent fields). \
         Respond with ONLY the JSON object."
    )
}

/// Strips markdown code fences, locates the first `{...}` span, and
/// parses it — repairing trailing commas and unquoted keys if the first
/// pass fails (ported from `extract_clean_json`).
pub fn parse_json_safely(text: &str) -> Option<Value> {
    static FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?\n?").expect("valid"));
    static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("valid"));
    static UNQUOTED_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+):").expect("valid"));

    let cleaned = FENCE_PATTERN.replace_all(text, "");
    let cleaned = cleaned.trim();

    let open = cleaned.find('{')?;
    let close = cleaned.rfind('}')?;
    if close <= open {
        return None;
    }
    let candidate = &cleaned[open..=close];

    if let Ok(value) = serde_json::from_str(candidate) {
        return Some(value);
    }

    let fixed = TRAILING_COMMA.replace_all(candidate, "$1");
    let fixed = UNQUOTED_KEY.replace_all(&fixed, "\"$1\":");
    serde_json::from_str(&fixed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json_block() {
        let text = "```json\n{\"processes\": [\"MIG\"], \"confidence\": 0.8}\n```";
        let value = parse_json_safely(text).unwrap();
        assert_eq!(value["confidence"], 0.8);
    }

    #[test]
    fn repairs_trailing_comma_and_unquoted_keys() {
        let text = "{processes: [\"MIG\"], confidence: 0.8,}";
        let value = parse_json_safely(text).unwrap();
        assert_eq!(value["processes"][0], "MIG");
    }

    #[test]
    fn no_braces_returns_none() {
        assert!(parse_json_safely("not json at all").is_none());
    }
}

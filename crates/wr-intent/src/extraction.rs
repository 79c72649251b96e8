//! LLM extraction orchestration: JSON -> normalized fields, regex
//! fallback on failure, confidence combination, and ambiguity detection
//! (§4.5 steps 5-8).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};
use wr_core::DomainVocabulary;

use crate::llm::LlmClient;
use crate::types::{ExpertiseMode, ProcessedIntent};

const AMBIGUITY_THRESHOLD: f32 = 0.6;
const REGEX_FALLBACK_CONFIDENCE_CAP: f32 = 0.3;

static AMPS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*amp").expect("valid"));
static VOLTAGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*v(olt)?").expect("valid"));
static WATTS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*watt").expect("valid"));
static THICKNESS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*mm").expect("valid"));

/// Runs the LLM structured-extraction call, falling back to a
/// regex-pattern extractor on any failure (§4.5 Errors).
pub async fn extract(
    llm: &LlmClient,
    english_query: &str,
    vocabulary: &DomainVocabulary,
) -> (Value, f32) {
    match llm.extract_intent(english_query, vocabulary).await {
        Ok(parsed) => {
            let confidence =
                parsed.get("confidence").and_then(Value::as_f64).unwrap_or(0.5) as f32;
            (parsed, confidence)
        }
        Err(err) => {
            warn!(error = %err, "LLM intent extraction failed, using regex fallback");
            (regex_fallback(english_query), REGEX_FALLBACK_CONFIDENCE_CAP)
        }
    }
}

/// Fills only the fields a plain regex pass can find; confidence is
/// capped by the caller at `REGEX_FALLBACK_CONFIDENCE_CAP`.
fn regex_fallback(query: &str) -> Value {
    let mut object = serde_json::Map::new();

    let processes: Vec<&str> = ["mig", "tig", "stick", "smaw", "gmaw", "gtaw", "fcaw"]
        .into_iter()
        .filter(|p| query.to_lowercase().contains(p))
        .collect();
    if !processes.is_empty() {
        object.insert(
            "processes".into(),
            Value::Array(processes.into_iter().map(|p| Value::String(p.to_uppercase())).collect()),
        );
    }

    if let Some(caps) = AMPS_PATTERN.captures(query) {
        if let Ok(amps) = caps[1].parse::<i64>() {
            object.insert("current_amps".into(), Value::from(amps));
        }
    }
    if let Some(caps) = VOLTAGE_PATTERN.captures(query) {
        if let Ok(volts) = caps[1].parse::<i64>() {
            object.insert("voltage".into(), Value::from(volts));
        }
    }
    if let Some(caps) = WATTS_PATTERN.captures(query) {
        if let Ok(watts) = caps[1].parse::<i64>() {
            object.insert("power_watts".into(), Value::from(watts));
        }
    }
    if let Some(caps) = THICKNESS_PATTERN.captures(query) {
        if let Ok(mm) = caps[1].parse::<f64>() {
            object.insert("thickness_mm".into(), Value::from(mm));
        }
    }

    object.insert("missing_params".into(), Value::Array(vec![Value::String("llm_unavailable".into())]));
    Value::Object(object)
}

/// Validates each extracted process string against the vocabulary
/// enum, asking the LLM once to remap anything unrecognized before
/// dropping it (§4.5 step 6).
pub async fn normalize_processes(
    llm: &LlmClient,
    raw_processes: &[String],
    vocabulary: &DomainVocabulary,
) -> Vec<String> {
    let mut normalized = Vec::with_capacity(raw_processes.len());
    for raw in raw_processes {
        if let Some(canonical) = vocabulary.normalize_process(raw) {
            normalized.push(canonical);
            continue;
        }
        info!(process = %raw, "process not in enum, asking LLM to remap");
        match llm.remap_process(raw, vocabulary).await {
            Some(remapped) => {
                info!(from = %raw, to = %remapped, "remapped process via LLM");
                normalized.push(remapped);
            }
            None => {
                info!(process = %raw, "dropping unrecognized process");
            }
        }
    }
    normalized
}

/// Combines intent/language/mode confidences (§4.5 step 7).
pub fn combine_confidence(intent_confidence: f32, language_confidence: f32, mode: ExpertiseMode) -> f32 {
    let combined =
        intent_confidence * 0.7 + language_confidence * 0.2 + mode.confidence_multiplier() * 0.1;
    combined.clamp(0.0, 1.0)
}

/// Flags ambiguous intents and seeds up to three clarification
/// questions from empty required slots (§4.5 step 8).
pub fn detect_ambiguity(intent: &ProcessedIntent) -> (bool, Vec<String>) {
    if intent.confidence >= AMBIGUITY_THRESHOLD {
        return (false, Vec::new());
    }

    let mut questions = Vec::new();
    if intent.processes.is_empty() {
        questions.push("What welding process do you need? (MIG, TIG, Stick, etc.)".to_string());
    }
    if intent.material.is_none() && intent.industry.is_none() {
        questions.push("What material will you be welding? (steel, aluminum, stainless steel, etc.)".to_string());
    }
    if intent.current_amps.is_none() && intent.power_watts.is_none() {
        questions.push("What power requirements do you have? (amps or watts)".to_string());
    }
    if intent.thickness_mm.is_none() {
        questions.push("What thickness material will you be welding? (in mm or inches)".to_string());
    }
    if intent.application.is_none() && intent.industry.is_none() {
        questions.push("What is the intended application? (automotive, construction, fabrication, etc.)".to_string());
    }
    for param in &intent.missing_params {
        match param.as_str() {
            "voltage" => questions.push("What voltage requirement do you have? (110V, 220V, 480V)".to_string()),
            "environment" => questions.push("Where will you be welding? (indoor, outdoor, marine, etc.)".to_string()),
            _ => {}
        }
    }

    questions.truncate(3);
    (true, questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_fallback_finds_amps_and_process() {
        let extracted = regex_fallback("need a MIG welder rated for 200 amp and 6mm steel");
        assert_eq!(extracted["current_amps"], 200);
        assert_eq!(extracted["processes"][0], "MIG");
        assert_eq!(extracted["thickness_mm"], 6.0);
    }

    #[test]
    fn ambiguous_below_threshold_seeds_questions() {
        let mut intent = ProcessedIntent::default();
        intent.confidence = 0.4;
        let (needs, questions) = detect_ambiguity(&intent);
        assert!(needs);
        assert!(!questions.is_empty());
        assert!(questions.len() <= 3);
    }

    #[test]
    fn confident_intent_skips_clarification() {
        let mut intent = ProcessedIntent::default();
        intent.confidence = 0.9;
        let (needs, questions) = detect_ambiguity(&intent);
        assert!(!needs);
        assert!(questions.is_empty());
    }
}

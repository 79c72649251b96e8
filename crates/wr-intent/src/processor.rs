//! Intent Processor (C5): `IntentProcessor::process` runs the full
//! 8-step pipeline of §4.5.

use serde_json::Value;
use wr_core::DomainVocabulary;

use crate::expertise::detect_mode;
use crate::extraction::{combine_confidence, detect_ambiguity, extract, normalize_processes};
use crate::language::{detect_language, translate_to_english};
use crate::llm::LlmClient;
use crate::product_match::match_product;
use crate::types::{ProcessedIntent, UserContext};

#[derive(Clone)]
pub struct IntentProcessor {
    llm: LlmClient,
    vocabulary: DomainVocabulary,
}

impl IntentProcessor {
    pub fn new(llm: LlmClient, vocabulary: DomainVocabulary) -> Self {
        Self { llm, vocabulary }
    }

    /// Public contract: `process(query, user_context) -> ProcessedIntent` (§4.5).
    pub async fn process(&self, query: &str, context: &UserContext) -> ProcessedIntent {
        // 1. Language detection.
        let (language, language_confidence) = detect_language(query);

        // 2. Translation to English.
        let translated_query = translate_to_english(query, language);

        // 3. Expertise detection.
        let (mode, _mode_score) = detect_mode(query, context, &self.vocabulary);

        let mut intent = ProcessedIntent {
            original_query: query.to_string(),
            translated_query: translated_query.clone(),
            language: Some(language),
            language_confidence,
            mode: Some(mode),
            ..Default::default()
        };

        // 4. Deterministic product-family + equipment-type matcher. When it
        // fires, it short-circuits the LLM extraction entirely.
        if let Some(matched) = match_product(&translated_query) {
            intent.mentioned_product = Some(matched.product);
            intent.application = Some(matched.application.to_string());
            intent.confidence =
                combine_confidence(matched.confidence, language_confidence, mode);
            let (needs_clarification, questions) = detect_ambiguity(&intent);
            intent.needs_clarification = needs_clarification;
            intent.clarification_questions = questions;
            return intent;
        }

        // 5. LLM structured extraction (or regex fallback on failure).
        let (extracted, intent_confidence) =
            extract(&self.llm, &translated_query, &self.vocabulary).await;
        apply_extracted_fields(&mut intent, &extracted);

        // 6. Process normalization against the vocabulary enum.
        intent.processes = normalize_processes(&self.llm, &intent.processes, &self.vocabulary).await;

        // 7. Confidence combination.
        intent.confidence = combine_confidence(intent_confidence, language_confidence, mode);
        intent.completeness = extracted.get("completeness").and_then(Value::as_f64).unwrap_or(0.0) as f32;

        // 8. Ambiguity detection.
        let (needs_clarification, questions) = detect_ambiguity(&intent);
        intent.needs_clarification = needs_clarification;
        intent.clarification_questions = questions;

        intent
    }
}

fn apply_extracted_fields(intent: &mut ProcessedIntent, extracted: &Value) {
    if let Some(processes) = extracted.get("processes").and_then(Value::as_array) {
        intent.processes = processes.iter().filter_map(Value::as_str).map(str::to_string).collect();
    }
    intent.material = extracted.get("material").and_then(Value::as_str).map(str::to_string);
    intent.power_watts = extracted.get("power_watts").and_then(Value::as_i64);
    intent.current_amps = extracted.get("current_amps").and_then(Value::as_i64);
    intent.voltage = extracted.get("voltage").and_then(Value::as_i64);
    intent.thickness_mm = extracted.get("thickness_mm").and_then(Value::as_f64);
    intent.environment = extracted.get("environment").and_then(Value::as_str).map(str::to_string);
    intent.application = extracted.get("application").and_then(Value::as_str).map(str::to_string);
    intent.industry = extracted.get("industry").and_then(Value::as_str).map(str::to_string);
    if let Some(missing) = extracted.get("missing_params").and_then(Value::as_array) {
        intent.missing_params = missing.iter().filter_map(Value::as_str).map(str::to_string).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;

    #[tokio::test]
    async fn product_match_short_circuits_llm_call() {
        let processor = IntentProcessor::new(
            LlmClient::new(LlmConfig { api_key: None, ..Default::default() }),
            DomainVocabulary::default(),
        );
        let context = UserContext::default();
        let intent = processor
            .process("is a wire feeder compatible with the Warrior 400i?", &context)
            .await;
        assert_eq!(intent.application.as_deref(), Some("compatibility"));
        assert!(intent.mentioned_product.is_some());
    }
}

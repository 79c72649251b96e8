//! Top-level entry point (§4.7): rerank, explain, format, translate back,
//! then fill in the telemetry fields.

use tracing::debug;
use wr_intent::{Language, ProcessedIntent, UserContext};
use wr_recommend::ScoredRecommendations;

use crate::explanation;
use crate::formatting::format_response;
use crate::rerank::rerank;
use crate::satisfaction::{overall_confidence, predict_satisfaction};
use crate::types::ComposedResponse;

/// Turns a scored recommendation set into the final user-facing response.
/// Never fails: an empty package list still produces a response asking a
/// clarifying question rather than an error.
pub fn compose(recommendations: &ScoredRecommendations, intent: &ProcessedIntent, context: &UserContext) -> ComposedResponse {
    let mut packages = recommendations.packages.clone();
    if !packages.is_empty() {
        rerank(&mut packages, context);
    }

    let mode = intent.mode.unwrap_or_default();
    let explanations = explanation::generate(&packages, mode, intent);
    let mut response = format_response(&packages, explanations, mode);

    let search_confidence = recommendations.search_metadata.as_ref().map(|m| m.confidence).unwrap_or(0.0);
    response.overall_confidence = overall_confidence(&packages, recommendations.trinity_formation_rate, search_confidence);
    response.satisfaction_prediction = predict_satisfaction(&packages, intent);
    response.needs_follow_up = recommendations.needs_follow_up || packages.is_empty();
    if response.needs_follow_up && response.follow_up_questions.is_empty() {
        response.follow_up_questions = response.related_questions.iter().take(2).cloned().collect();
    }

    if let Some(language) = intent.language {
        if language != Language::En {
            debug!(lang = language.code(), "back-translating composed response");
            back_translate(&mut response, language);
        }
    }

    response
}

fn back_translate(response: &mut ComposedResponse, language: Language) {
    response.title = wr_intent::language::translate_from_english(&response.title, language);
    response.summary = wr_intent::language::translate_from_english(&response.summary, language);
    response.detailed_explanation = wr_intent::language::translate_from_english(&response.detailed_explanation, language);
    translate_all(&mut response.technical_notes, language);
    translate_all(&mut response.package_descriptions, language);
    translate_all(&mut response.next_steps, language);
    translate_all(&mut response.related_questions, language);
    translate_all(&mut response.follow_up_questions, language);
}

fn translate_all(texts: &mut [String], language: Language) {
    for text in texts.iter_mut() {
        *text = wr_intent::language::translate_from_english(text, language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_recommendations_still_ask_a_follow_up() {
        let recommendations = ScoredRecommendations::empty(true);
        let intent = ProcessedIntent::default();
        let context = UserContext::default();
        let response = compose(&recommendations, &intent, &context);
        assert!(response.needs_follow_up);
        assert_eq!(response.overall_confidence, 0.0);
    }
}

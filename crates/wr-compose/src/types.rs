//! Response Composer output types (§4.7).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplanationLevel {
    Technical,
    Educational,
    Balanced,
}

/// The final user-facing payload returned by `compose` (§4.7 step 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedResponse {
    pub title: String,
    pub summary: String,
    pub detailed_explanation: String,
    pub technical_notes: Vec<String>,
    pub package_descriptions: Vec<String>,
    pub next_steps: Vec<String>,
    pub related_questions: Vec<String>,
    pub explanation_level: ExplanationLevel,

    pub overall_confidence: f64,
    pub satisfaction_prediction: f64,
    pub needs_follow_up: bool,
    pub follow_up_questions: Vec<String>,
}

impl ComposedResponse {
    /// The catastrophic-failure minimal response (§4.8): zero confidence
    /// plus a single error-recovery question, so the HTTP call never
    /// fails closed.
    pub fn error_fallback() -> Self {
        ComposedResponse {
            title: "We couldn't complete that request".to_string(),
            summary: "Something went wrong while generating recommendations.".to_string(),
            detailed_explanation: String::new(),
            technical_notes: Vec::new(),
            package_descriptions: Vec::new(),
            next_steps: vec!["Try rephrasing your request".to_string()],
            related_questions: vec!["Could you describe what you're trying to weld?".to_string()],
            explanation_level: ExplanationLevel::Balanced,
            overall_confidence: 0.0,
            satisfaction_prediction: 0.0,
            needs_follow_up: true,
            follow_up_questions: vec!["Could you describe what you're trying to weld?".to_string()],
        }
    }
}

//! Shared types for the intent pipeline (§3, §4.5).

use serde::{Deserialize, Serialize};

/// Caller-supplied context carried alongside the raw query (§4.5 inputs).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserContext {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub expertise_history: Vec<String>,
    #[serde(default)]
    pub previous_queries: Vec<String>,
    pub industry_context: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    Pt,
    It,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Pt => "pt",
            Language::It => "it",
        }
    }
}

/// Expertise mode auto-detected from the query, history, and signal counts
/// (§4.5 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpertiseMode {
    Expert,
    Guided,
    Hybrid,
}

impl ExpertiseMode {
    /// Confidence multiplier applied in the combined-confidence step (§4.5 step 7).
    pub fn confidence_multiplier(&self) -> f32 {
        match self {
            ExpertiseMode::Expert => 1.1,
            ExpertiseMode::Guided => 0.9,
            ExpertiseMode::Hybrid => 1.0,
        }
    }
}

/// A deterministically matched named product (§4.5 step 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionedProduct {
    pub family: String,
    pub equipment_type: Option<String>,
}

/// The structured output of `IntentProcessor::process` (§4.5).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedIntent {
    pub original_query: String,
    pub translated_query: String,
    pub language: Option<Language>,
    pub language_confidence: f32,

    pub mode: Option<ExpertiseMode>,
    pub mentioned_product: Option<MentionedProduct>,

    pub processes: Vec<String>,
    pub material: Option<String>,
    pub power_watts: Option<i64>,
    pub current_amps: Option<i64>,
    pub voltage: Option<i64>,
    pub thickness_mm: Option<f64>,
    pub environment: Option<String>,
    pub application: Option<String>,
    pub industry: Option<String>,

    pub confidence: f32,
    pub completeness: f32,
    pub missing_params: Vec<String>,

    pub needs_clarification: bool,
    pub clarification_questions: Vec<String>,
}

impl Default for ExpertiseMode {
    fn default() -> Self {
        ExpertiseMode::Hybrid
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

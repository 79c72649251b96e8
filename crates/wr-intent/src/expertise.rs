//! Expertise-mode auto-detection (§4.5 step 3).
//!
//! Ported from `AutoModeDetector`: four weighted sub-scores combine into
//! a confidence, then guided-signal hits can still route to GUIDED below
//! the expert threshold. Signal lists and weights come from
//! `DomainVocabulary` (loaded from `mode_detection.yaml`), so an
//! operator can retune expert/guided vocabulary and thresholds without a
//! code change. Regex patterns with no config counterpart are compiled
//! once via `once_cell::sync::Lazy`.

use once_cell::sync::Lazy;
use regex::Regex;
use wr_core::DomainVocabulary;

use crate::types::{ExpertiseMode, UserContext};

const COMPLEXITY_WEIGHT: f32 = 0.3;
const HISTORY_WEIGHT: f32 = 0.2;
const SPECIFICITY_WEIGHT: f32 = 0.1;

/// Two or more configured guided signals in one query outweigh a
/// borderline expert-confidence score.
const GUIDED_SIGNAL_HIT_THRESHOLD: usize = 2;

static COMPLEXITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s*(amp|volt|watt|mm|cfh|ipm)").expect("static regex is valid")
});

static SPECIFICITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(aristo\s*\d+|warrior\s*\d+|renegade\s*\w*\d*|dynasty\s*\d+|power\s*wave\s*\d+)")
        .expect("static regex is valid")
});

/// Detects the expertise mode for a single query, given the caller's
/// expertise history (mix of past "expert"/"guided"/"hybrid" labels) and
/// up to the last 10 previous queries.
pub fn detect_mode(query: &str, context: &UserContext, vocabulary: &DomainVocabulary) -> (ExpertiseMode, f32) {
    let lower = query.to_lowercase();

    let expert_signal_score = signal_score(&lower, &vocabulary.expert_signals);
    let guided_signal_score = signal_score(&lower, &vocabulary.guided_signals);
    let complexity_score = complexity_score(&lower, query);
    let history_score = history_score(context, vocabulary);
    let specificity_score = specificity_score(&lower);

    let combined = expert_signal_score * vocabulary.expert_weight
        + complexity_score * COMPLEXITY_WEIGHT
        + history_score * HISTORY_WEIGHT
        + specificity_score * SPECIFICITY_WEIGHT
        - guided_signal_score * vocabulary.guided_weight;
    let combined = combined.clamp(0.0, 1.0);

    let guided_signal_count =
        vocabulary.guided_signals.iter().filter(|signal| lower.contains(signal.to_lowercase().as_str())).count();

    let mode = if combined >= vocabulary.confidence_threshold {
        ExpertiseMode::Expert
    } else if guided_signal_count >= GUIDED_SIGNAL_HIT_THRESHOLD {
        ExpertiseMode::Guided
    } else {
        ExpertiseMode::Hybrid
    };

    (mode, combined)
}

fn signal_score(lower_query: &str, signals: &[String]) -> f32 {
    let hits = signals.iter().filter(|signal| lower_query.contains(signal.to_lowercase().as_str())).count();
    (hits as f32 / 3.0).min(1.0)
}

fn complexity_score(lower_query: &str, original_query: &str) -> f32 {
    let mut score = 0.0f32;
    let len = original_query.chars().count();
    if len > 200 {
        score += 0.3;
    } else if len > 100 {
        score += 0.2;
    }

    let number_matches = COMPLEXITY_PATTERN.find_iter(lower_query).count();
    score += (number_matches as f32 * 0.1).min(0.3);

    let process_tokens = ["mig", "tig", "stick", "smaw", "gmaw", "gtaw", "fcaw", "saw", "mma"];
    let distinct_processes = process_tokens.iter().filter(|token| lower_query.contains(**token)).count();
    if distinct_processes >= 2 {
        score += 0.2;
    }

    score.min(1.0)
}

fn history_score(context: &UserContext, vocabulary: &DomainVocabulary) -> f32 {
    let recent: Vec<&String> = context.previous_queries.iter().rev().take(10).collect();
    if recent.is_empty() {
        return 0.5;
    }

    let mut expert_hits = 0usize;
    let mut guided_hits = 0usize;
    for query in &recent {
        let lower = query.to_lowercase();
        if vocabulary.expert_signals.iter().any(|s| lower.contains(s.to_lowercase().as_str()))
            || SPECIFICITY_PATTERN.is_match(&lower)
        {
            expert_hits += 1;
        }
        if vocabulary.guided_signals.iter().any(|s| lower.contains(s.to_lowercase().as_str())) {
            guided_hits += 1;
        }
    }

    if expert_hits + guided_hits == 0 {
        0.5
    } else {
        expert_hits as f32 / (expert_hits + guided_hits) as f32
    }
}

fn specificity_score(lower_query: &str) -> f32 {
    let mut score = 0.0f32;
    let model_matches = SPECIFICITY_PATTERN.find_iter(lower_query).count();
    score += (model_matches as f32 * 0.3).min(0.3 * 3.0);
    if ["compatible", "replacement", "upgrade"].iter().any(|w| lower_query.contains(w)) {
        score += 0.2;
    }
    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_context() -> UserContext {
        UserContext::default()
    }

    fn sample_vocabulary() -> DomainVocabulary {
        DomainVocabulary {
            expert_signals: vec![
                "amperage".into(),
                "duty cycle".into(),
                "polarity".into(),
                "wire feed speed".into(),
                "shielding gas".into(),
                "gmaw".into(),
            ],
            guided_signals: vec!["beginner".into(), "new to welding".into(), "help me choose".into()],
            expert_weight: 0.4,
            guided_weight: 0.6,
            confidence_threshold: 0.7,
            ..Default::default()
        }
    }

    #[test]
    fn detailed_technical_query_scores_expert() {
        let query = "need 250 amp MIG with adjustable wire feed speed and shielding gas CFH for aristo 500, \
            compatible replacement upgrade, duty cycle and polarity matter here for this GMAW job";
        let vocabulary = sample_vocabulary();
        let (mode, score) = detect_mode(query, &empty_context(), &vocabulary);
        assert_eq!(mode, ExpertiseMode::Expert);
        assert!(score >= vocabulary.confidence_threshold);
    }

    #[test]
    fn beginner_phrase_forces_guided() {
        let vocabulary = sample_vocabulary();
        let (mode, _) =
            detect_mode("I'm new to welding, help me choose a machine", &empty_context(), &vocabulary);
        assert_eq!(mode, ExpertiseMode::Guided);
    }

    #[test]
    fn plain_query_defaults_to_hybrid() {
        let vocabulary = sample_vocabulary();
        let (mode, _) = detect_mode("looking for a welder for steel", &empty_context(), &vocabulary);
        assert_eq!(mode, ExpertiseMode::Hybrid);
    }

    #[test]
    fn higher_confidence_threshold_demotes_a_borderline_query_from_expert() {
        let query = "need 250 amp MIG with shielding gas CFH for aristo 500, duty cycle matters, GMAW job";
        let lenient = sample_vocabulary();
        let (lenient_mode, score) = detect_mode(query, &empty_context(), &lenient);
        assert_eq!(lenient_mode, ExpertiseMode::Expert);

        let strict = DomainVocabulary { confidence_threshold: score + 0.1, ..sample_vocabulary() };
        let (strict_mode, _) = detect_mode(query, &empty_context(), &strict);
        assert_ne!(strict_mode, ExpertiseMode::Expert);
    }
}

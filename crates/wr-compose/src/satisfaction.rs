//! Satisfaction prediction (§4.7 step 5). Telemetry only — never shown
//! to the user and never fed back into ranking.

use wr_intent::{ExpertiseMode, ProcessedIntent};
use wr_recommend::TrinityPackage;

const MEAN_SCORE_WEIGHT: f64 = 0.6;
const TRINITY_RATE_WEIGHT: f64 = 0.3;
const MODE_BONUS: f64 = 0.1;
const EXPERT_HIGH_SCORE_THRESHOLD: f64 = 0.8;
const NO_PACKAGES_SATISFACTION: f64 = 0.2;

pub fn predict_satisfaction(packages: &[TrinityPackage], intent: &ProcessedIntent) -> f64 {
    if packages.is_empty() {
        return NO_PACKAGES_SATISFACTION;
    }

    let mean_score = packages.iter().map(|p| p.package_score).sum::<f64>() / packages.len() as f64;
    let trinity_rate = packages.iter().filter(|p| p.trinity_compliance).count() as f64 / packages.len() as f64;

    let mut satisfaction = mean_score * MEAN_SCORE_WEIGHT + trinity_rate * TRINITY_RATE_WEIGHT;

    let mode = intent.mode.unwrap_or_default();
    let mode_met_expectation = match mode {
        ExpertiseMode::Expert => mean_score > EXPERT_HIGH_SCORE_THRESHOLD,
        ExpertiseMode::Guided => true,
        ExpertiseMode::Hybrid => false,
    };
    if mode_met_expectation {
        satisfaction += MODE_BONUS;
    }

    satisfaction.min(1.0)
}

/// Overall confidence (§4.7 step 5 companion metric, used in the minimal
/// error response and in `overall_confidence`): weighted blend of mean
/// package score, routing confidence, and the Trinity formation rate.
pub fn overall_confidence(packages: &[TrinityPackage], trinity_formation_rate: f64, search_confidence: f64) -> f64 {
    if packages.is_empty() {
        return 0.0;
    }
    let mean_score = packages.iter().map(|p| p.package_score).sum::<f64>() / packages.len() as f64;
    (mean_score * 0.6 + search_confidence * 0.2 + trinity_formation_rate * 0.2).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_packages_gives_low_fixed_satisfaction() {
        let intent = ProcessedIntent::default();
        assert_eq!(predict_satisfaction(&[], &intent), NO_PACKAGES_SATISFACTION);
    }

    #[test]
    fn zero_packages_yields_zero_confidence() {
        assert_eq!(overall_confidence(&[], 0.0, 0.9), 0.0);
    }
}

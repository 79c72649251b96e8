//! Final response assembly (§4.7 step 3): title, next steps, related
//! questions, explanation level, and per-mode package descriptions.

use wr_intent::ExpertiseMode;
use wr_recommend::TrinityPackage;

use crate::explanation::Explanations;
use crate::types::{ComposedResponse, ExplanationLevel};

pub fn format_response(packages: &[TrinityPackage], explanations: Explanations, mode: ExpertiseMode) -> ComposedResponse {
    let (title, next_steps, related_questions, explanation_level) = match mode {
        ExpertiseMode::Expert => (
            "Technical Welding System Analysis",
            vec!["Review technical specifications", "Validate power requirements", "Confirm installation requirements"],
            vec![
                "What are the duty cycle requirements?",
                "Do you need additional consumables?",
                "Are there specific certification requirements?",
            ],
            ExplanationLevel::Technical,
        ),
        ExpertiseMode::Guided => (
            "Your Perfect Welding Package",
            vec!["Get safety equipment", "Consider training classes", "Plan your workspace"],
            vec!["What safety equipment do I need?", "Where can I learn welding?", "What materials can I weld with this?"],
            ExplanationLevel::Educational,
        ),
        ExpertiseMode::Hybrid => (
            "Welding Package Recommendation",
            vec!["Review package details", "Check delivery options", "Contact sales if needed"],
            vec!["Are there other configurations available?", "What's the warranty coverage?", "Do you offer installation services?"],
            ExplanationLevel::Balanced,
        ),
    };

    ComposedResponse {
        title: title.to_string(),
        summary: explanations.summary,
        detailed_explanation: explanations.detailed_explanation,
        technical_notes: explanations.technical_notes,
        package_descriptions: package_descriptions(packages, mode),
        next_steps: next_steps.into_iter().map(String::from).collect(),
        related_questions: related_questions.into_iter().map(String::from).collect(),
        explanation_level,
        overall_confidence: 0.0,
        satisfaction_prediction: 0.0,
        needs_follow_up: packages.is_empty(),
        follow_up_questions: Vec::new(),
    }
}

fn package_descriptions(packages: &[TrinityPackage], mode: ExpertiseMode) -> Vec<String> {
    packages
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, p)| match mode {
            ExpertiseMode::Expert => {
                format!("Config {}: Score {:.2}, Trinity {}, Price ${:.2}", i + 1, p.package_score, p.trinity_compliance, p.total_price)
            }
            ExpertiseMode::Guided => {
                format!("Option {}: Complete welding package for ${:.2} - includes everything you need to start welding!", i + 1, p.total_price)
            }
            ExpertiseMode::Hybrid => {
                let power_source_name = p.power_source.as_ref().map(|c| c.product.name.as_str()).unwrap_or("Unknown");
                format!("Package {}: {} system - ${:.2} (Score: {:.1}%)", i + 1, power_source_name, p.total_price, p.package_score * 100.0)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explanation;
    use wr_intent::ProcessedIntent;

    #[test]
    fn expert_mode_sets_technical_explanation_level() {
        let intent = ProcessedIntent::default();
        let explanations = explanation::generate(&[], ExpertiseMode::Expert, &intent);
        let response = format_response(&[], explanations, ExpertiseMode::Expert);
        assert_eq!(response.explanation_level, ExplanationLevel::Technical);
        assert!(response.needs_follow_up);
    }
}

//! Mode-aware explanation generation (§4.7 step 2).

use std::fmt::Write as _;

use wr_intent::{ExpertiseMode, ProcessedIntent};
use wr_recommend::TrinityPackage;

pub struct Explanations {
    pub summary: String,
    pub detailed_explanation: String,
    pub technical_notes: Vec<String>,
}

pub fn generate(packages: &[TrinityPackage], mode: ExpertiseMode, intent: &ProcessedIntent) -> Explanations {
    match mode {
        ExpertiseMode::Expert => expert_explanations(packages, intent),
        ExpertiseMode::Guided => guided_explanations(packages, intent),
        ExpertiseMode::Hybrid => balanced_explanations(packages),
    }
}

fn expert_explanations(packages: &[TrinityPackage], intent: &ProcessedIntent) -> Explanations {
    let Some(best) = packages.first() else {
        return Explanations {
            summary: "No compatible Trinity packages found matching specified parameters.".to_string(),
            detailed_explanation: "No compatibility data available.".to_string(),
            technical_notes: vec!["No performance data available.".to_string()],
        };
    };

    let mut summary = format!("Optimal Trinity configuration identified with {:.1}% compatibility score.", best.package_score * 100.0);
    if let Some(ps) = &best.power_source {
        let _ = write!(summary, " | PowerSource: {}", ps.product.name);
    }
    if let Some(feeder) = &best.feeder {
        let _ = write!(summary, " | Wire Feeder: {}", feeder.product.name);
    }
    if let Some(cooler) = &best.cooler {
        let _ = write!(summary, " | Cooling System: {}", cooler.product.name);
    }
    let _ = write!(summary, " | Total system cost: ${:.2}", best.total_price);
    if !intent.processes.is_empty() {
        let _ = write!(summary, " | Optimized for {} processes", intent.processes.join(", "));
    }

    let detailed_explanation = packages
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, p)| {
            format!(
                "Package {}: Trinity compliance {}, compliance score {:.1}%, package score {:.2}",
                i + 1,
                p.trinity_compliance,
                p.compliance_score * 100.0,
                p.package_score
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    let trinity_compliant = packages.iter().filter(|p| p.trinity_compliance).count();
    let avg_score = packages.iter().map(|p| p.package_score).sum::<f64>() / packages.len() as f64;
    let performance_note =
        format!("Generated {} packages, {} Trinity-compliant, average score: {:.2}", packages.len(), trinity_compliant, avg_score);

    Explanations { summary, detailed_explanation, technical_notes: vec![performance_note] }
}

fn guided_explanations(packages: &[TrinityPackage], intent: &ProcessedIntent) -> Explanations {
    let Some(best) = packages.first() else {
        return Explanations {
            summary: "I couldn't find a complete welding package that matches your needs. Let me ask a few questions to help you better."
                .to_string(),
            detailed_explanation: String::new(),
            technical_notes: Vec::new(),
        };
    };

    let mut summary = "I found a great welding package for you! This complete setup includes everything you need:\n\n".to_string();
    if let Some(ps) = &best.power_source {
        let _ = write!(summary, "Power Source: {} - the main welding machine that provides the power.\n", ps.product.name);
    }
    if let Some(feeder) = &best.feeder {
        let _ = write!(summary, "Wire Feeder: {} - feeds welding wire automatically so you can focus on your weld.\n", feeder.product.name);
    }
    if let Some(cooler) = &best.cooler {
        let _ = write!(summary, "Cooling System: {} - keeps your torch cool during longer welding sessions.\n", cooler.product.name);
    }
    let _ = write!(summary, "\nTotal Package Price: ${:.2}\n", best.total_price);
    summary.push_str("Why This Works: these components are designed to work together, giving you professional results.");

    let detailed_explanation = "Understanding your welding package:\n\n\
         Power Source (Welder): the heart of your setup, converts electricity into welding power.\n\
         Wire Feeder: automatically feeds welding wire at the right speed (for MIG welding).\n\
         Cooling System: prevents overheating during long welding sessions.\n\
         Why Trinity matters: these three components work together, each one essential for good results."
        .to_string();

    let mut guidance = vec!["Getting Started Tips:".to_string()];
    if let Some(material) = &intent.material {
        guidance.push(format!("This setup is optimized for {material} welding"));
    }
    if !intent.processes.is_empty() {
        guidance.push(format!("Perfect for {} welding processes", intent.processes.join(", ")));
    }
    guidance.push("Start with practice pieces before your main project".to_string());
    guidance.push("Make sure you have proper safety equipment (helmet, gloves, ventilation)".to_string());
    guidance.push("Consider taking a welding class to learn proper techniques".to_string());

    Explanations { summary, detailed_explanation, technical_notes: vec![guidance.join("\n")] }
}

fn balanced_explanations(packages: &[TrinityPackage]) -> Explanations {
    let Some(best) = packages.first() else {
        return Explanations {
            summary: "No suitable welding packages found. Please provide more specific requirements.".to_string(),
            detailed_explanation: "No features to highlight.".to_string(),
            technical_notes: vec!["Consider expanding search criteria or contacting technical support for custom solutions.".to_string()],
        };
    };

    let mut summary = format!("Recommended Welding Package (Score: {:.1}%)\n\n", best.package_score * 100.0);
    if let Some(ps) = &best.power_source {
        let _ = write!(summary, "Power Source: {}\n", ps.product.name);
    }
    if let Some(feeder) = &best.feeder {
        let _ = write!(summary, "Wire Feeder: {}\n", feeder.product.name);
    }
    if let Some(cooler) = &best.cooler {
        let _ = write!(summary, "Cooling: {}\n", cooler.product.name);
    }
    let _ = write!(summary, "Total: ${:.2}\n\n", best.total_price);
    summary.push_str("This Trinity package ensures all components work together optimally.");

    let mut features = vec![
        "Complete Trinity package (Power Source + Feeder + Cooler)".to_string(),
        "Components verified for compatibility".to_string(),
        "Business-grade quality and reliability".to_string(),
    ];
    if best.compliance_score > 0.8 {
        features.push("Meets enterprise business rules and standards".to_string());
    }
    let detailed_explanation = features.join("\n");

    let recommendation_note = match packages.len() {
        0 => unreachable!(),
        1 => "Single optimal configuration identified. This package provides the best match for your requirements.".to_string(),
        n => format!("Found {n} compatible packages. Top recommendation shown above. Contact sales for alternative configurations."),
    };

    Explanations { summary, detailed_explanation, technical_notes: vec![recommendation_note] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_packages_yield_placeholder_explanations() {
        let intent = ProcessedIntent::default();
        let result = generate(&[], ExpertiseMode::Expert, &intent);
        assert!(result.summary.contains("No compatible Trinity packages"));
    }
}

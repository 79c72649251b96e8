//! Domain Vocabulary (C1, §4.1).
//!
//! A static, immutable table of weighted welding terms loaded once at
//! startup from `welding_processes.yaml` and `mode_detection.yaml`. Used
//! by the embedding service (C2) to bias semantic similarity toward
//! domain-critical tokens, and by the intent processor (C5) for expert
//! signal matching.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Per-term weight. Larger means more emphasis during `enhance()`.
pub type Weight = f32;

#[derive(Debug, Clone, Deserialize)]
struct WeldingProcessesFile {
    #[serde(default)]
    welding_processes: ProcessesSection,
    #[serde(default)]
    materials: MaterialsSection,
    #[serde(default)]
    applications: Vec<String>,
    #[serde(default)]
    industries: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ProcessesSection {
    #[serde(default)]
    primary: Vec<String>,
    #[serde(default)]
    technical: Vec<String>,
    #[serde(default)]
    aliases: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MaterialsSection {
    #[serde(default)]
    primary: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ModeDetectionFile {
    #[serde(default)]
    expert_signals: Vec<String>,
    #[serde(default)]
    guided_signals: Vec<String>,
    #[serde(default = "default_expert_weight")]
    pub expert_weight: f32,
    #[serde(default = "default_guided_weight")]
    pub guided_weight: f32,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

fn default_expert_weight() -> f32 {
    0.4
}
fn default_guided_weight() -> f32 {
    0.6
}
fn default_confidence_threshold() -> f32 {
    0.7
}

/// Common product-family patterns that are always treated as product names,
/// even if not present in `mode_detection.yaml`'s expert signals.
const COMMON_PRODUCT_PATTERNS: &[&str] = &[
    "renegade",
    "warrior",
    "aristo",
    "robustfeed",
    "cool2",
    "cooling unit",
    "wire feeder",
    "power source",
    "torch",
    "electrode holder",
];

/// Mapping of technical acronym to canonical primary process name,
/// used by `normalize_process` (§9 process aliasing).
const TECHNICAL_TO_PRIMARY: &[(&str, &str)] = &[
    ("GMAW", "MIG"),
    ("GTAW", "TIG"),
    ("SMAW", "STICK"),
    ("FCAW", "FLUX_CORE"),
];

/// Weighted term table, organized into the six categories of §4.1.
#[derive(Debug, Clone, Default)]
pub struct DomainVocabulary {
    pub product_names: HashMap<String, Weight>,
    pub processes: HashMap<String, Weight>,
    pub technical_terms: HashMap<String, Weight>,
    pub materials: HashMap<String, Weight>,
    pub applications: HashMap<String, Weight>,
    pub general_terms: HashMap<String, Weight>,

    primary_processes: Vec<String>,
    technical_processes: Vec<String>,
    process_aliases: HashMap<String, Vec<String>>,
    all_materials: Vec<String>,
    all_industries: Vec<String>,

    pub expert_signals: Vec<String>,
    pub guided_signals: Vec<String>,
    pub expert_weight: f32,
    pub guided_weight: f32,
    pub confidence_threshold: f32,
}

impl DomainVocabulary {
    /// Load from the two YAML config files. Missing files are a fatal
    /// `ConfigError` at startup (§4.5 Errors, §6 Configuration), never a
    /// per-request failure.
    pub fn load(welding_processes_path: &Path, mode_detection_path: &Path) -> CoreResult<Self> {
        let welding_raw = std::fs::read_to_string(welding_processes_path).map_err(|e| {
            CoreError::Config(format!(
                "failed to read {}: {e}",
                welding_processes_path.display()
            ))
        })?;
        let welding: WeldingProcessesFile = serde_yaml::from_str(&welding_raw)
            .map_err(|e| CoreError::Config(format!("invalid welding_processes.yaml: {e}")))?;

        let mode_raw = std::fs::read_to_string(mode_detection_path).map_err(|e| {
            CoreError::Config(format!("failed to read {}: {e}", mode_detection_path.display()))
        })?;
        let mode: ModeDetectionFile = serde_yaml::from_str(&mode_raw)
            .map_err(|e| CoreError::Config(format!("invalid mode_detection.yaml: {e}")))?;

        Ok(Self::from_parts(welding, mode))
    }

    fn from_parts(welding: WeldingProcessesFile, mode: ModeDetectionFile) -> Self {
        let mut vocab = DomainVocabulary {
            expert_weight: mode.expert_weight,
            guided_weight: mode.guided_weight,
            confidence_threshold: mode.confidence_threshold,
            primary_processes: welding.welding_processes.primary.clone(),
            technical_processes: welding.welding_processes.technical.clone(),
            process_aliases: welding.welding_processes.aliases.clone(),
            all_materials: welding.materials.primary.clone(),
            all_industries: welding.industries.clone(),
            ..Default::default()
        };

        // Classify expert signals the way embedding_generator.py does:
        // digits/known product names -> product_names; known process acronym
        // -> processes; everything else -> technical_terms.
        for signal in &mode.expert_signals {
            let lower = signal.to_lowercase();
            if signal.chars().any(|c| c.is_ascii_digit())
                || matches!(signal.as_str(), "Aristo 500 ix" | "Warrior 400i" | "Renegade 300")
            {
                vocab.product_names.insert(lower, 3.0);
            } else if matches!(signal.to_uppercase().as_str(), "MIG" | "TIG" | "GMAW" | "GTAW" | "SMAW" | "FCAW") {
                vocab.processes.insert(lower, 2.5);
            } else {
                vocab.technical_terms.insert(lower, 2.0);
            }
        }

        for process in welding.welding_processes.primary.iter().chain(welding.welding_processes.technical.iter()) {
            vocab.processes.insert(process.to_lowercase(), 2.5);
        }
        for material in &welding.materials.primary {
            vocab.materials.insert(material.to_lowercase().replace('_', " "), 1.8);
        }
        for app in &welding.applications {
            vocab.applications.insert(app.to_lowercase(), 1.5);
        }
        for industry in &welding.industries {
            vocab.general_terms.insert(industry.to_lowercase(), 1.2);
        }
        for pattern in COMMON_PRODUCT_PATTERNS {
            vocab.product_names.insert(pattern.to_string(), 3.0);
        }

        vocab.expert_signals = mode.expert_signals;
        vocab.guided_signals = mode.guided_signals;
        vocab
    }

    /// Enhance text by appending weighted repetitions of every matched term
    /// (§4.1, grounded in `embedding_generator.py::_enhance_with_domain_vocabulary`).
    /// Strictly additive — never mutates or truncates the original text.
    pub fn enhance(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let mut parts = vec![text.to_string()];

        let categories: [(&HashMap<String, Weight>, fn(&str) -> String); 6] = [
            (&self.product_names, |t| format!("{t} {t}")),
            (&self.processes, |t| format!("{t} welding process")),
            (&self.technical_terms, |t| format!("{t} specification")),
            (&self.materials, |t| format!("{t} material")),
            (&self.applications, |t| format!("{t} application")),
            (&self.general_terms, |t| t.to_string()),
        ];

        for (terms, render) in categories {
            for term in terms.keys() {
                if lower.contains(term.as_str()) {
                    parts.push(render(term));
                }
            }
        }

        parts.join(" ")
    }

    pub fn primary_processes(&self) -> &[String] {
        &self.primary_processes
    }

    pub fn technical_processes(&self) -> &[String] {
        &self.technical_processes
    }

    pub fn all_processes(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .primary_processes
            .iter()
            .chain(self.technical_processes.iter())
            .cloned()
            .collect();
        all.sort();
        all.dedup();
        all
    }

    pub fn materials(&self) -> &[String] {
        &self.all_materials
    }

    pub fn industries(&self) -> &[String] {
        &self.all_industries
    }

    /// Normalize a loose process string (`gmaw` -> `MIG`, alias lookups, ...)
    /// to the canonical enum string, or `None` if it cannot be resolved (§9).
    pub fn normalize_process(&self, input: &str) -> Option<String> {
        let upper = input.trim().to_uppercase();

        if self.primary_processes.iter().any(|p| p.to_uppercase() == upper) {
            return Some(upper);
        }

        if self.technical_processes.iter().any(|p| p.to_uppercase() == upper) {
            if let Some((_, primary)) = TECHNICAL_TO_PRIMARY.iter().find(|(tech, _)| *tech == upper) {
                return Some((*primary).to_string());
            }
            return Some(upper);
        }

        let lower = input.trim().to_lowercase();
        for (primary, aliases) in &self.process_aliases {
            if aliases.iter().any(|a| a.to_lowercase() == lower) {
                return Some(primary.to_uppercase());
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vocab() -> DomainVocabulary {
        let welding = WeldingProcessesFile {
            welding_processes: ProcessesSection {
                primary: vec!["MIG".into(), "TIG".into(), "STICK".into(), "FLUX_CORE".into()],
                technical: vec!["GMAW".into(), "GTAW".into(), "SMAW".into(), "FCAW".into()],
                aliases: HashMap::from([("MIG".to_string(), vec!["pulse welding".to_string()])]),
            },
            materials: MaterialsSection {
                primary: vec!["aluminum".into(), "stainless_steel".into()],
            },
            applications: vec!["automotive".into()],
            industries: vec!["automotive".into(), "aerospace".into()],
        };
        let mode = ModeDetectionFile {
            expert_signals: vec!["Aristo 500 ix".into(), "GMAW".into(), "duty cycle".into()],
            guided_signals: vec!["beginner".into(), "new to welding".into()],
            expert_weight: 0.4,
            guided_weight: 0.6,
            confidence_threshold: 0.7,
        };
        DomainVocabulary::from_parts(welding, mode)
    }

    #[test]
    fn normalizes_gmaw_to_mig() {
        let vocab = sample_vocab();
        assert_eq!(vocab.normalize_process("gmaw").as_deref(), Some("MIG"));
        assert_eq!(vocab.normalize_process("GMAW").as_deref(), Some("MIG"));
    }

    #[test]
    fn normalizes_alias_to_primary() {
        let vocab = sample_vocab();
        assert_eq!(vocab.normalize_process("pulse welding").as_deref(), Some("MIG"));
    }

    #[test]
    fn unknown_process_returns_none() {
        let vocab = sample_vocab();
        assert_eq!(vocab.normalize_process("plasma arc welding"), None);
    }

    #[test]
    fn enhance_is_additive_and_repeats_product_names() {
        let vocab = sample_vocab();
        let enhanced = vocab.enhance("Aristo 500 ix for aluminum MIG welding");
        assert!(enhanced.starts_with("Aristo 500 ix for aluminum MIG welding"));
        assert!(enhanced.contains("aristo 500 ix aristo 500 ix"));
        assert!(enhanced.contains("mig welding process"));
        assert!(enhanced.contains("aluminum material"));
    }
}

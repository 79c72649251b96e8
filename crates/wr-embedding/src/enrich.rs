//! Builds the enriched text fed to the embedding model (§4.2): name
//! tokens, category, flattened specifications, and cleaned description.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;
use wr_core::{DomainVocabulary, Product};

const MAX_SPEC_VALUE_LEN: usize = 500;

/// `embed_product`'s text-building half — everything up to (not including)
/// the vocabulary `enhance()` pass, which the caller applies afterward.
pub fn build_product_text(product: &Product, vocabulary: &DomainVocabulary) -> String {
    let mut parts = Vec::new();

    let name_tokens: Vec<&str> = product
        .name
        .split_whitespace()
        .filter(|t| t.len() >= 2 && !t.chars().all(|c| c.is_ascii_digit()))
        .collect();
    if !name_tokens.is_empty() {
        parts.push(name_tokens.join(" "));
    }

    parts.push(product.category.as_str().to_string());

    let spec_text = flatten_specifications(&product.specifications);
    if !spec_text.is_empty() {
        parts.push(spec_text);
    }

    if let Some(description) = &product.description {
        let cleaned = clean_html(description);
        if !cleaned.is_empty() {
            parts.push(cleaned);
        }
    }

    let joined = parts.join(" ");
    vocabulary.enhance(&joined)
}

/// `embed_query`'s text-building half: whitespace cleanup, vocabulary pass
/// is applied by the caller.
pub fn clean_query_text(query_text: &str) -> String {
    collapse_whitespace(query_text.trim())
}

fn flatten_specifications(specs: &HashMap<String, Value>) -> String {
    let mut texts = Vec::new();
    for (field, value) in specs {
        let readable_field = humanize_field_name(field);
        match value {
            Value::Array(values) => {
                for v in values {
                    let cleaned = clean_spec_value(v);
                    if !cleaned.is_empty() {
                        texts.push(format!("{readable_field} {cleaned}"));
                    }
                }
            }
            Value::Object(map) => {
                for (sub_key, sub_value) in map {
                    let cleaned = clean_spec_value(sub_value);
                    if !cleaned.is_empty() {
                        let sub_field = humanize_field_name(sub_key);
                        texts.push(format!("{readable_field} {sub_field} {cleaned}"));
                    }
                }
            }
            other => {
                let cleaned = clean_spec_value(other);
                if !cleaned.is_empty() {
                    texts.push(format!("{readable_field} {cleaned}"));
                }
            }
        }
    }
    texts.join(" ")
}

fn humanize_field_name(field: &str) -> String {
    field_mapping(field)
        .map(str::to_string)
        .unwrap_or_else(|| field.replace(['_', '-'], " ").to_lowercase())
}

fn field_mapping(field: &str) -> Option<&'static str> {
    Some(match field.to_lowercase().as_str() {
        "process" => "welding process",
        "processes" => "welding processes",
        "application" => "application",
        "applications" => "applications",
        "industry" => "industry",
        "use_case" => "use case",
        "use_cases" => "use cases",
        "input_voltage" => "input voltage",
        "output_voltage" => "output voltage",
        "input_current" => "input current",
        "output_current" => "output current",
        "amperage" => "amperage",
        "voltage" => "voltage",
        "power" => "power",
        "duty_cycle" => "duty cycle",
        "electrical_requirements" => "electrical requirements",
        "dimensions" => "dimensions",
        "weight" => "weight",
        "size" => "size",
        "portability" => "portability",
        "mounting" => "mounting",
        "material_thickness" => "material thickness",
        "material_type" => "material type",
        "wire_diameter" => "wire diameter",
        "electrode_diameter" => "electrode diameter",
        "feed_speed" => "wire feed speed",
        "travel_speed" => "travel speed",
        "environment" => "environment",
        "operating_temperature" => "operating temperature",
        "protection_rating" => "protection rating",
        "certification" => "certification",
        "compliance" => "compliance",
        "connectivity" => "connectivity",
        "control_type" => "control type",
        "interface" => "interface",
        "remote_control" => "remote control",
        "automation" => "automation",
        _ => return None,
    })
}

fn clean_spec_value(value: &Value) -> String {
    let raw = match value {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let cleaned = if raw.contains('<') && raw.contains('>') {
        clean_html(raw)
    } else {
        collapse_whitespace(raw).replace("&amp;", "&")
    };

    cleaned.chars().take(MAX_SPEC_VALUE_LEN).collect()
}

fn clean_html(raw: &str) -> String {
    let tag_re = Regex::new(r"<[^>]+>").expect("static regex");
    let without_tags = tag_re.replace_all(raw, " ");
    let unescaped = without_tags
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"");
    collapse_whitespace(unescaped.trim())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wr_core::Category;

    #[test]
    fn strips_html_tags_and_collapses_whitespace() {
        let cleaned = clean_html("<p>Heavy   duty &amp; reliable</p>");
        assert_eq!(cleaned, "Heavy duty & reliable");
    }

    #[test]
    fn builds_text_from_name_category_and_specs() {
        let mut specs = HashMap::new();
        specs.insert("amperage".to_string(), Value::String("400A".to_string()));
        let product = Product {
            specifications: specs,
            ..Product::placeholder(Category::PowerSource, "Warrior 400i")
        };
        let vocabulary = DomainVocabulary::default();
        let text = build_product_text(&product, &vocabulary);
        assert!(text.contains("Warrior"));
        assert!(text.contains("PowerSource"));
        assert!(text.contains("amperage 400A"));
    }
}

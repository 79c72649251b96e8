//! `CompatibilityLoader` (§3 loader supplement): parses
//! `compatibility_rules.json` into `COMPATIBLE_WITH`/`DETERMINES` edges.
//! Reload is handled as delete-then-create per rule-type label rather
//! than the per-rule diffing the product loader does — simpler, and
//! compatibility rules are small enough that a full replace is cheap.

use std::path::Path;

use chrono::Utc;
use neo4rs::Query;
use serde::Deserialize;
use tracing::info;
use wr_core::CompatibilityEdge;
use wr_graph::GraphClient;

use crate::error::LoaderResult;
use crate::report::{read_json_array, LoadReport};

const REQUIRED_FIELDS: [&str; 4] = ["rule_id", "rule_type", "source_gin", "target_gin"];

#[derive(Debug, Deserialize)]
struct RawRule {
    rule_id: Option<String>,
    rule_type: Option<String>,
    source_gin: Option<String>,
    target_gin: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    bidirectional: bool,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

struct NormalizedRule {
    rule_id: String,
    label: &'static str,
    source_gin: String,
    target_gin: String,
    confidence: f32,
    bidirectional: bool,
    metadata: serde_json::Value,
}

pub struct CompatibilityLoader<'a> {
    graph: &'a GraphClient,
}

impl<'a> CompatibilityLoader<'a> {
    pub fn new(graph: &'a GraphClient) -> Self {
        CompatibilityLoader { graph }
    }

    pub async fn load_file(&self, path: &Path) -> LoaderResult<LoadReport> {
        let records = read_json_array(path)?;
        self.load(records).await
    }

    pub async fn load(&self, records: Vec<serde_json::Value>) -> LoaderResult<LoadReport> {
        let mut report = LoadReport { total: records.len(), ..Default::default() };
        let mut rules = Vec::new();

        for (index, raw_value) in records.into_iter().enumerate() {
            let record_id = format!("rule_{index}");
            match Self::validate_record(raw_value) {
                Ok(rule) => {
                    report.accept();
                    rules.push(rule);
                }
                Err(message) => report.reject(record_id, message),
            }
        }

        self.reset_labels().await?;
        for rule in rules {
            self.create_edge(&rule).await?;
            if rule.bidirectional && rule.label == "COMPATIBLE_WITH" {
                self.create_reverse_edge(&rule).await?;
            }
        }

        info!(total = report.total, valid = report.valid, invalid = report.invalid, "compatibility load complete");
        Ok(report)
    }

    fn validate_record(raw_value: serde_json::Value) -> Result<NormalizedRule, String> {
        for field in REQUIRED_FIELDS {
            if raw_value.get(field).is_none() {
                return Err(format!("missing required field: {field}"));
            }
        }
        let raw: RawRule = serde_json::from_value(raw_value).map_err(|e| format!("malformed rule record: {e}"))?;

        let rule_id = raw.rule_id.unwrap_or_default().trim().to_string();
        if rule_id.is_empty() {
            return Err("empty rule_id".to_string());
        }
        let source_gin = raw.source_gin.unwrap_or_default().trim().to_string();
        let target_gin = raw.target_gin.unwrap_or_default().trim().to_string();
        if source_gin.is_empty() || target_gin.is_empty() {
            return Err("empty source_gin or target_gin".to_string());
        }

        let label = match raw.rule_type.unwrap_or_default().trim() {
            "COMPATIBLE_WITH" => "COMPATIBLE_WITH",
            "DETERMINES" => "DETERMINES",
            other => return Err(format!("invalid rule_type: {other}")),
        };

        let confidence = CompatibilityEdge::clamp_confidence(raw.confidence.unwrap_or(1.0));

        Ok(NormalizedRule {
            rule_id,
            label,
            source_gin,
            target_gin,
            confidence,
            bidirectional: raw.bidirectional,
            metadata: raw.metadata.unwrap_or(serde_json::Value::Null),
        })
    }

    async fn reset_labels(&self) -> LoaderResult<()> {
        for label in ["COMPATIBLE_WITH", "DETERMINES"] {
            let cypher = format!("MATCH (:Product)-[r:{label}]->(:Product) DELETE r");
            self.graph.execute_write(Query::new(cypher)).await?;
        }
        Ok(())
    }

    async fn create_edge(&self, rule: &NormalizedRule) -> LoaderResult<()> {
        let cypher = format!(
            "MATCH (source:Product {{gin: $source_gin}})
             MATCH (target:Product {{gin: $target_gin}})
             CREATE (source)-[r:{} {{
                rule_id: $rule_id,
                confidence: $confidence,
                metadata: $metadata,
                created_at: $created_at
             }}]->(target)",
            rule.label
        );
        let query = Query::new(cypher)
            .param("source_gin", rule.source_gin.clone())
            .param("target_gin", rule.target_gin.clone())
            .param("rule_id", rule.rule_id.clone())
            .param("confidence", rule.confidence as f64)
            .param("metadata", rule.metadata.to_string())
            .param("created_at", Utc::now().to_rfc3339());
        self.graph.execute_write(query).await?;
        Ok(())
    }

    async fn create_reverse_edge(&self, rule: &NormalizedRule) -> LoaderResult<()> {
        let cypher = format!(
            "MATCH (source:Product {{gin: $source_gin}})
             MATCH (target:Product {{gin: $target_gin}})
             CREATE (target)-[r:{} {{
                rule_id: $rule_id,
                confidence: $confidence,
                metadata: $metadata,
                created_at: $created_at
             }}]->(source)",
            rule.label
        );
        let query = Query::new(cypher)
            .param("source_gin", rule.source_gin.clone())
            .param("target_gin", rule.target_gin.clone())
            .param("rule_id", format!("{}_reverse", rule.rule_id))
            .param("confidence", rule.confidence as f64)
            .param("metadata", rule.metadata.to_string())
            .param("created_at", Utc::now().to_rfc3339());
        self.graph.execute_write(query).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rule_type_is_rejected() {
        let raw = serde_json::json!({
            "rule_id": "r1",
            "rule_type": "EXCLUDES",
            "source_gin": "a",
            "target_gin": "b",
        });
        assert!(CompatibilityLoader::validate_record(raw).is_err());
    }

    #[test]
    fn valid_rule_clamps_out_of_range_confidence() {
        let raw = serde_json::json!({
            "rule_id": "r1",
            "rule_type": "COMPATIBLE_WITH",
            "source_gin": "a",
            "target_gin": "b",
            "confidence": 5.0,
        });
        let rule = CompatibilityLoader::validate_record(raw).expect("valid rule");
        assert_eq!(rule.confidence, 0.95);
    }
}

//! `ProductLoader` (§3 loader supplement): parses
//! `enhanced_simplified_products.json` and upserts the product catalog.
//! Must run before the compatibility and sales loaders — they validate
//! their GIN references against what this loader has already written.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use neo4rs::Query;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};
use wr_core::Category;
use wr_graph::GraphClient;

use crate::error::LoaderResult;
use crate::report::{read_json_array, LoadReport};

const REQUIRED_FIELDS: [&str; 3] = ["gin_number", "product_name", "component_category"];
const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
struct RawProduct {
    gin_number: Option<String>,
    product_name: Option<String>,
    component_category: Option<String>,
    #[serde(default)]
    product_description: Option<String>,
    #[serde(default)]
    specifications: Option<serde_json::Value>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    datasheet_url: Option<String>,
    #[serde(default)]
    countries_available: Option<Vec<String>>,
    #[serde(default = "default_true")]
    is_available: bool,
}

fn default_true() -> bool {
    true
}

struct NormalizedProduct {
    gin: String,
    name: String,
    category: Category,
    description: String,
    specifications: serde_json::Value,
    price: Option<f64>,
    image_url: Option<String>,
    datasheet_url: Option<String>,
    countries_available: Vec<String>,
    is_available: bool,
}

pub struct ProductLoader<'a> {
    graph: &'a GraphClient,
    url_pattern: Regex,
    gin_pattern: Regex,
}

impl<'a> ProductLoader<'a> {
    pub fn new(graph: &'a GraphClient) -> Self {
        ProductLoader {
            graph,
            url_pattern: Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("static pattern"),
            gin_pattern: Regex::new(r"^\d{10}$").expect("static pattern"),
        }
    }

    pub async fn load_file(&self, path: &Path) -> LoaderResult<LoadReport> {
        let records = read_json_array(path)?;
        self.load(records).await
    }

    pub async fn load(&self, records: Vec<serde_json::Value>) -> LoaderResult<LoadReport> {
        let mut report = LoadReport { total: records.len(), ..Default::default() };
        let mut seen_gins = HashSet::new();

        for (index, raw_value) in records.into_iter().enumerate() {
            let record_id = format!("product_{index}");
            match self.validate_record(raw_value, &record_id, &mut seen_gins) {
                Ok(normalized) => {
                    self.upsert(normalized).await?;
                    report.accept();
                }
                Err(message) => report.reject(record_id, message),
            }
        }

        info!(total = report.total, valid = report.valid, invalid = report.invalid, "product load complete");
        Ok(report)
    }

    fn validate_record(
        &self,
        raw_value: serde_json::Value,
        record_id: &str,
        seen_gins: &mut HashSet<String>,
    ) -> Result<NormalizedProduct, String> {
        for field in REQUIRED_FIELDS {
            if raw_value.get(field).is_none() {
                return Err(format!("missing required field: {field}"));
            }
        }

        let raw: RawProduct =
            serde_json::from_value(raw_value).map_err(|e| format!("malformed product record: {e}"))?;

        let gin = raw.gin_number.unwrap_or_default().trim().to_string();
        if gin.is_empty() {
            return Err("empty GIN number".to_string());
        }
        if !self.gin_pattern.is_match(&gin) {
            warn!(gin, "GIN number format unusual, accepting anyway");
        }
        if !seen_gins.insert(gin.clone()) {
            return Err(format!("duplicate GIN number in file: {gin}"));
        }

        let name = raw.product_name.unwrap_or_default().trim().to_string();
        if name.len() < 3 {
            return Err("product name missing or too short".to_string());
        }

        let raw_category = raw.component_category.unwrap_or_default();
        let category = Category::normalize(raw_category.trim());

        let description = raw
            .product_description
            .unwrap_or_default()
            .trim()
            .chars()
            .take(MAX_DESCRIPTION_LEN)
            .collect::<String>();

        let specifications = match raw.specifications {
            Some(serde_json::Value::Object(map)) => serde_json::Value::Object(map),
            Some(_) => return Err("specifications must be an object".to_string()),
            None => serde_json::Value::Object(serde_json::Map::new()),
        };

        let image_url = self.validate_url(record_id, raw.image_url, "image_url");
        let datasheet_url = self.validate_url(record_id, raw.datasheet_url, "datasheet_url");

        let countries_available = raw
            .countries_available
            .unwrap_or_default()
            .into_iter()
            .filter(|code| code.len() == 3)
            .collect();

        Ok(NormalizedProduct {
            gin,
            name,
            category,
            description,
            specifications,
            price: raw.price,
            image_url,
            datasheet_url,
            countries_available,
            is_available: raw.is_available,
        })
    }

    fn validate_url(&self, record_id: &str, url: Option<String>, field: &str) -> Option<String> {
        let url = url?;
        if self.url_pattern.is_match(&url) {
            Some(url)
        } else {
            warn!(record_id, field, url, "invalid URL, dropping");
            None
        }
    }

    /// `MERGE`+`SET` upsert (§3 lifecycle: update in place on re-run).
    async fn upsert(&self, product: NormalizedProduct) -> LoaderResult<()> {
        let now = Utc::now().to_rfc3339();
        let cypher = "MERGE (p:Product {gin: $gin})
            ON CREATE SET p.created_at = $updated_at
            SET p.name = $name,
                p.category = $category,
                p.description = $description,
                p.specifications = $specifications,
                p.price = $price,
                p.image_url = $image_url,
                p.datasheet_url = $datasheet_url,
                p.countries_available = $countries_available,
                p.is_available = $is_available,
                p.updated_at = $updated_at";

        let query = Query::new(cypher.to_string())
            .param("gin", product.gin.clone())
            .param("name", product.name)
            .param("category", product.category.as_str())
            .param("description", product.description)
            .param("specifications", product.specifications.to_string())
            .param("price", product.price)
            .param("image_url", product.image_url)
            .param("datasheet_url", product.datasheet_url)
            .param("countries_available", product.countries_available)
            .param("is_available", product.is_available)
            .param("updated_at", now);

        self.graph.execute_write(query).await?;
        info!(gin = product.gin, "upserted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_pattern_rejects_schemeless_strings() {
        let pattern = Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap();
        assert!(pattern.is_match("https://example.com/image.png"));
        assert!(!pattern.is_match("not-a-url"));
    }

    #[test]
    fn gin_pattern_matches_ten_digits() {
        let pattern = Regex::new(r"^\d{10}$").unwrap();
        assert!(pattern.is_match("0445250880"));
        assert!(!pattern.is_match("ABC123"));
    }
}

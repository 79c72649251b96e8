//! Mapping between `neo4rs::Row` and `wr_core::Product` (§3).

use chrono::{DateTime, Utc};
use neo4rs::Row;
use wr_core::{Category, Product};

use crate::error::{GraphError, GraphResult};

/// Standard `RETURN` clause fragment used by every query that materializes
/// full `Product` nodes, aliased so `row_to_product` can rely on fixed names.
pub const PRODUCT_RETURN_FIELDS: &str = "p.gin as gin, p.name as name, p.category as category, \
     p.subcategory as subcategory, p.description as description, \
     p.specifications as specifications, p.price as price, \
     p.image_url as image_url, p.datasheet_url as datasheet_url, \
     p.countries_available as countries_available, p.is_available as is_available, \
     p.embedding as embedding, p.embedding_text as embedding_text, \
     p.sales_frequency as sales_frequency, p.created_at as created_at, p.updated_at as updated_at";

pub fn row_to_product(row: &Row) -> GraphResult<Product> {
    let gin: String = row.get("gin").map_err(|_| GraphError::MissingField("gin".into()))?;
    let name: String = row.get("name").map_err(|_| GraphError::MissingField("name".into()))?;
    let category_raw: String = row.get("category").unwrap_or_default();
    let specifications_raw: String = row.get("specifications").unwrap_or_default();
    let specifications = if specifications_raw.is_empty() {
        Default::default()
    } else {
        serde_json::from_str(&specifications_raw).unwrap_or_default()
    };

    let created_at: String = row.get("created_at").unwrap_or_default();
    let updated_at: String = row.get("updated_at").unwrap_or_default();

    Ok(Product {
        gin,
        name,
        category: Category::normalize(&category_raw),
        subcategory: row.get("subcategory").ok(),
        description: row.get("description").ok(),
        specifications,
        price: row.get::<f64>("price").ok(),
        image_url: row.get("image_url").ok(),
        datasheet_url: row.get("datasheet_url").ok(),
        countries_available: row.get::<Vec<String>>("countries_available").unwrap_or_default(),
        is_available: row.get("is_available").unwrap_or(true),
        embedding: row.get::<Vec<f32>>("embedding").ok(),
        embedding_text: row.get("embedding_text").ok(),
        sales_frequency: row.get::<i64>("sales_frequency").unwrap_or(0).max(0) as u32,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

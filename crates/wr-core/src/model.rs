//! Graph-store-agnostic domain model (§3 of the specification).
//!
//! Nothing in this module knows about `neo4rs` or Cypher — adapters in
//! `wr-graph` translate these types to and from rows.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product category enum (§3). Kept as a validated closed set rather than
/// an open string, per the "dynamic class generation" redesign note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    PowerSource,
    Feeder,
    Cooler,
    Torch,
    Consumable,
    Accessory,
    PowerSourceAccessory,
    FeederAccessory,
    ConnectivityAccessory,
    Interconnector,
    Remote,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PowerSource => "PowerSource",
            Category::Feeder => "Feeder",
            Category::Cooler => "Cooler",
            Category::Torch => "Torch",
            Category::Consumable => "Consumable",
            Category::Accessory => "Accessory",
            Category::PowerSourceAccessory => "PowerSourceAccessory",
            Category::FeederAccessory => "FeederAccessory",
            Category::ConnectivityAccessory => "ConnectivityAccessory",
            Category::Interconnector => "Interconnector",
            Category::Remote => "Remote",
            Category::Unknown => "Unknown",
        }
    }

    /// Normalize loose loader input (`power_source`, `wire_feeder`, ...)
    /// into the canonical category. Unrecognized input maps to `Unknown`
    /// rather than erroring — the loader counts it, it does not reject it.
    pub fn normalize(raw: &str) -> Category {
        match raw.to_lowercase().replace(['-', ' '], "_").as_str() {
            "powersource" | "power_source" => Category::PowerSource,
            "feeder" | "wire_feeder" | "wirefeeder" => Category::Feeder,
            "cooler" | "cooling_unit" => Category::Cooler,
            "torch" | "welding_torch" | "mig_torch" | "tig_torch" => Category::Torch,
            "consumable" => Category::Consumable,
            "accessory" | "welding_accessory" | "safety_accessory" => Category::Accessory,
            "powersourceaccessory" | "power_source_accessory" => Category::PowerSourceAccessory,
            "feederaccessory" | "feeder_accessory" => Category::FeederAccessory,
            "connectivityaccessory" | "connectivity_accessory" => Category::ConnectivityAccessory,
            "interconnector" => Category::Interconnector,
            "remote" | "monitoring" => Category::Remote,
            _ => Category::Unknown,
        }
    }

    /// The three categories that together form a Trinity.
    pub fn is_trinity_member(&self) -> bool {
        matches!(self, Category::PowerSource | Category::Feeder | Category::Cooler)
    }
}

/// A welding equipment product (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// External stable identifier. Unique within the catalog.
    pub gin: String,
    pub name: String,
    pub category: Category,
    pub subcategory: Option<String>,
    /// May contain HTML; cleaned by consumers before display or embedding.
    pub description: Option<String>,
    /// Flattened one level; serialized as a JSON string at the graph-store
    /// boundary because Neo4j properties cannot nest maps.
    pub specifications: HashMap<String, serde_json::Value>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub datasheet_url: Option<String>,
    pub countries_available: Vec<String>,
    pub is_available: bool,
    pub embedding: Option<Vec<f32>>,
    pub embedding_text: Option<String>,
    pub sales_frequency: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A synthetic placeholder used by the "all-in-one" business rule
    /// (§3 invariants) so an all-in-one PowerSource can still form a Trinity.
    pub fn placeholder(category: Category, label: &str) -> Product {
        let now = Utc::now();
        Product {
            gin: format!("placeholder::{}", label.to_lowercase().replace(' ', "-")),
            name: label.to_string(),
            category,
            subcategory: None,
            description: None,
            specifications: HashMap::new(),
            price: None,
            image_url: None,
            datasheet_url: None,
            countries_available: Vec::new(),
            is_available: true,
            embedding: None,
            embedding_text: None,
            sales_frequency: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.gin.starts_with("placeholder::")
    }
}

/// Dimensionality required by the `product_embeddings` vector index (§3, §6).
pub const EMBEDDING_DIM: usize = 384;

/// A customer/account aggregate (§3). Kept minimal — the core never writes
/// Customer nodes, only reads aggregated facts off them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub facilities: Vec<String>,
    pub warehouses: Vec<String>,
    pub transaction_count: u32,
    pub categories_purchased: Vec<Category>,
}

/// A single order line item (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub order_id: String,
    pub line_no: u32,
    pub product_gin: String,
    pub description: String,
    pub facility: Option<String>,
    pub warehouse: Option<String>,
    pub category: Category,
}

/// A rule edge: `COMPATIBLE_WITH` or `DETERMINES` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    CompatibleWith,
    Determines,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityEdge {
    pub rule_id: String,
    pub kind: RuleKind,
    pub source_gin: String,
    pub target_gin: String,
    /// Clamped to `[0,1]` at ingestion; invalid input clamps to 0.95 (§3 invariant).
    pub confidence: f32,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl CompatibilityEdge {
    pub fn clamp_confidence(raw: f32) -> f32 {
        if (0.0..=1.0).contains(&raw) {
            raw
        } else {
            0.95
        }
    }
}

/// A bidirectional `CO_OCCURS` edge (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoOccurrenceEdge {
    pub product_a: String,
    pub product_b: String,
    pub frequency: u32,
    pub orders_count: u32,
    pub last_occurrence_date: DateTime<Utc>,
    pub confidence_score: f32,
    pub sample_orders: Vec<String>,
}

/// A co-ordered PowerSource + Feeder + Cooler triple (§3, Glossary).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trinity {
    pub trinity_id: String,
    pub power_source_gin: String,
    pub feeder_gin: String,
    pub cooler_gin: String,
    pub observed_order_count: u32,
}

impl Trinity {
    /// `trinity_id = hash(power_source_gin, feeder_gin, cooler_gin)` (§3).
    pub fn compute_id(power_source_gin: &str, feeder_gin: &str, cooler_gin: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        power_source_gin.hash(&mut hasher);
        feeder_gin.hash(&mut hasher);
        cooler_gin.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    pub fn new(power_source_gin: String, feeder_gin: String, cooler_gin: String, observed_order_count: u32) -> Self {
        let trinity_id = Self::compute_id(&power_source_gin, &feeder_gin, &cooler_gin);
        Trinity {
            trinity_id,
            power_source_gin,
            feeder_gin,
            cooler_gin,
            observed_order_count,
        }
    }
}

/// A curated fallback package keyed by PowerSource (§3, Glossary).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenPackage {
    pub power_source_gin: String,
    pub product_gins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_normalizes_loose_loader_input() {
        assert_eq!(Category::normalize("power_source").as_str(), "PowerSource");
        assert_eq!(Category::normalize("Wire Feeder").as_str(), "Feeder");
        assert_eq!(Category::normalize("cooling_unit").as_str(), "Cooler");
        assert_eq!(Category::normalize("something_else").as_str(), "Unknown");
    }

    #[test]
    fn trinity_id_is_order_sensitive_and_deterministic() {
        let a = Trinity::compute_id("ps1", "fd1", "cl1");
        let b = Trinity::compute_id("ps1", "fd1", "cl1");
        assert_eq!(a, b);
    }

    #[test]
    fn confidence_clamps_invalid_values_to_0_95() {
        assert_eq!(CompatibilityEdge::clamp_confidence(0.5), 0.5);
        assert_eq!(CompatibilityEdge::clamp_confidence(1.5), 0.95);
        assert_eq!(CompatibilityEdge::clamp_confidence(-0.1), 0.95);
    }
}

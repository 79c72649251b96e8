//! `SalesLoader` (§3 loader supplement): parses `sales_data.json` into
//! `Transaction`/`Customer` nodes, derives `CO_OCCURS` edges from
//! products sharing an `order_id`, and derives `Trinity` nodes for
//! orders whose line items span exactly one PowerSource, Feeder, and
//! Cooler — including the all-in-one synthesis rule for PowerSources
//! sold without a separate feeder or cooler line item.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Utc;
use neo4rs::Query;
use serde::Deserialize;
use tracing::info;
use wr_core::{Category, CoOccurrenceEdge, Trinity};
use wr_graph::GraphClient;

use crate::error::LoaderResult;
use crate::report::LoadReport;

/// The Renegade PowerSource sold as a complete all-in-one unit, with no
/// separate feeder or cooler line item (§3 invariant).
const ALL_IN_ONE_POWER_SOURCE_GIN: &str = "0445250880";
const NO_FEEDER_GIN: &str = "F000000007";
const NO_COOLER_GIN: &str = "F000000005";

const REQUIRED_FIELDS: [&str; 3] = ["order_id", "line_no", "gin"];

#[derive(Debug, Deserialize)]
struct RawSalesRecord {
    order_id: Option<String>,
    line_no: Option<serde_json::Value>,
    gin: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    facility: Option<String>,
    #[serde(default)]
    warehouse: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Clone)]
struct SalesLine {
    order_id: String,
    line_no: String,
    gin: String,
    description: String,
    customer: String,
    facility: String,
    warehouse: String,
    category: Category,
}

#[derive(Default)]
struct CustomerAccum {
    facilities: HashSet<String>,
    warehouses: HashSet<String>,
    categories: HashSet<Category>,
    transaction_count: u32,
}

struct CoOccurrenceAccum {
    frequency: u32,
    orders: HashSet<String>,
}

pub struct SalesLoader<'a> {
    graph: &'a GraphClient,
}

impl<'a> SalesLoader<'a> {
    pub fn new(graph: &'a GraphClient) -> Self {
        SalesLoader { graph }
    }

    pub async fn load_file(&self, path: &Path, known_gins: Option<&HashSet<String>>) -> LoaderResult<LoadReport> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| crate::error::LoaderError::Io { path: path.display().to_string(), source })?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|source| crate::error::LoaderError::Parse { path: path.display().to_string(), source })?;
        let records = match value {
            serde_json::Value::Object(mut map) => {
                map.remove("sales_records").and_then(|v| v.as_array().cloned()).unwrap_or_default()
            }
            serde_json::Value::Array(items) => items,
            _ => Vec::new(),
        };
        self.load(records, known_gins).await
    }

    pub async fn load(
        &self,
        records: Vec<serde_json::Value>,
        known_gins: Option<&HashSet<String>>,
    ) -> LoaderResult<LoadReport> {
        let mut report = LoadReport { total: records.len(), ..Default::default() };
        let mut orders: HashMap<String, Vec<SalesLine>> = HashMap::new();
        let mut missing_refs = HashSet::new();

        for (index, raw_value) in records.into_iter().enumerate() {
            let record_id = format!("record_{index}");
            match Self::validate_record(raw_value) {
                Ok(line) => {
                    if let Some(known) = known_gins {
                        if !known.contains(&line.gin) {
                            missing_refs.insert(line.gin.clone());
                            continue;
                        }
                    }
                    report.accept();
                    orders.entry(line.order_id.clone()).or_default().push(line);
                }
                Err(message) => report.reject(record_id, message),
            }
        }
        report.missing_references = missing_refs.len();

        self.ensure_all_in_one_placeholders(&orders).await?;
        self.write_transactions_and_customers(&orders).await?;

        let enhanced = Self::enhance_all_in_one_orders(orders.clone());
        let co_occurrences = Self::calculate_co_occurrences(&enhanced);
        self.write_co_occurrences(&co_occurrences).await?;

        let determines = self.load_determines().await?;
        let trinities = Self::derive_trinities(&enhanced, &determines);
        self.write_trinities(&trinities).await?;

        info!(
            total = report.total,
            valid = report.valid,
            invalid = report.invalid,
            missing_references = report.missing_references,
            orders = orders.len(),
            co_occurrences = co_occurrences.len(),
            trinities = trinities.len(),
            "sales load complete"
        );
        Ok(report)
    }

    fn validate_record(raw_value: serde_json::Value) -> Result<SalesLine, String> {
        for field in REQUIRED_FIELDS {
            if raw_value.get(field).is_none() {
                return Err(format!("missing required field: {field}"));
            }
        }
        let raw: RawSalesRecord =
            serde_json::from_value(raw_value).map_err(|e| format!("malformed sales record: {e}"))?;

        let order_id = raw.order_id.unwrap_or_default().trim().to_string();
        let gin = raw.gin.unwrap_or_default().trim().to_string();
        let line_no = match raw.line_no {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        if order_id.is_empty() || line_no.is_empty() || gin.is_empty() {
            return Err("missing order_id, line_no, or gin".to_string());
        }

        Ok(SalesLine {
            order_id,
            line_no,
            gin,
            description: raw.description.unwrap_or_default().trim().to_string(),
            customer: raw.customer.unwrap_or_default().trim().to_string(),
            facility: raw.facility.unwrap_or_default().trim().to_string(),
            warehouse: raw.warehouse.unwrap_or_default().trim().to_string(),
            category: Category::normalize(&raw.category.unwrap_or_default()),
        })
    }

    /// For every order containing the all-in-one PowerSource, append
    /// synthetic Feeder/Cooler line items so co-occurrence and Trinity
    /// derivation still represent the unit's missing categories.
    fn enhance_all_in_one_orders(mut orders: HashMap<String, Vec<SalesLine>>) -> HashMap<String, Vec<SalesLine>> {
        for lines in orders.values_mut() {
            let has_all_in_one = lines.iter().any(|l| l.gin == ALL_IN_ONE_POWER_SOURCE_GIN);
            if !has_all_in_one {
                continue;
            }
            let needs_cooler = !lines.iter().any(|l| l.gin == NO_COOLER_GIN);
            let needs_feeder = !lines.iter().any(|l| l.gin == NO_FEEDER_GIN);
            let order_id = lines[0].order_id.clone();

            if needs_cooler {
                lines.push(SalesLine {
                    order_id: order_id.clone(),
                    line_no: "F005_AUTO".to_string(),
                    gin: NO_COOLER_GIN.to_string(),
                    description: "No Cooler Available - All-in-one unit".to_string(),
                    customer: String::new(),
                    facility: String::new(),
                    warehouse: String::new(),
                    category: Category::Cooler,
                });
            }
            if needs_feeder {
                lines.push(SalesLine {
                    order_id,
                    line_no: "F007_AUTO".to_string(),
                    gin: NO_FEEDER_GIN.to_string(),
                    description: "No Feeder Available - All-in-one unit".to_string(),
                    customer: String::new(),
                    facility: String::new(),
                    warehouse: String::new(),
                    category: Category::Feeder,
                });
            }
        }
        orders
    }

    /// Frequency-only confidence scoring (no reliable date data exists):
    /// `confidence = frequency / max_frequency`, capped at 1.0.
    fn calculate_co_occurrences(orders: &HashMap<String, Vec<SalesLine>>) -> Vec<CoOccurrenceEdge> {
        let mut pairs: HashMap<(String, String), CoOccurrenceAccum> = HashMap::new();

        for (order_id, lines) in orders {
            let mut gins: Vec<&str> = lines.iter().map(|l| l.gin.as_str()).collect();
            gins.sort_unstable();
            gins.dedup();
            if gins.len() < 2 {
                continue;
            }
            for i in 0..gins.len() {
                for j in (i + 1)..gins.len() {
                    let key = (gins[i].to_string(), gins[j].to_string());
                    let accum = pairs.entry(key).or_insert_with(|| CoOccurrenceAccum {
                        frequency: 0,
                        orders: HashSet::new(),
                    });
                    accum.frequency += 1;
                    accum.orders.insert(order_id.clone());
                }
            }
        }

        let max_frequency = pairs.values().map(|a| a.frequency).max().unwrap_or(1).max(1);
        let now = Utc::now();

        pairs
            .into_iter()
            .map(|((product_a, product_b), accum)| {
                let confidence_score = (accum.frequency as f32 / max_frequency as f32).min(1.0);
                let mut sample_orders: Vec<String> = accum.orders.iter().cloned().collect();
                sample_orders.sort_unstable();
                sample_orders.truncate(5);

                CoOccurrenceEdge {
                    product_a,
                    product_b,
                    frequency: accum.frequency,
                    orders_count: accum.orders.len() as u32,
                    last_occurrence_date: now,
                    confidence_score,
                    sample_orders,
                }
            })
            .collect()
    }

    fn derive_trinities(
        orders: &HashMap<String, Vec<SalesLine>>,
        determines: &HashMap<String, HashMap<Category, Vec<String>>>,
    ) -> Vec<Trinity> {
        let mut trinities: HashMap<String, Trinity> = HashMap::new();

        for lines in orders.values() {
            let mut power_sources = Vec::new();
            let mut feeders = Vec::new();
            let mut coolers = Vec::new();
            for line in lines {
                match line.category {
                    Category::PowerSource => power_sources.push(line.gin.clone()),
                    Category::Feeder => feeders.push(line.gin.clone()),
                    Category::Cooler => coolers.push(line.gin.clone()),
                    _ => {}
                }
            }
            if power_sources.is_empty() {
                continue;
            }

            for ps_gin in &power_sources {
                let feeder = find_compatible(ps_gin, &feeders, Category::Feeder, determines);
                let cooler = find_compatible(ps_gin, &coolers, Category::Cooler, determines);
                if let (Some(feeder_gin), Some(cooler_gin)) = (feeder, cooler) {
                    let trinity_id = Trinity::compute_id(ps_gin, &feeder_gin, &cooler_gin);
                    trinities
                        .entry(trinity_id)
                        .and_modify(|t| t.observed_order_count += 1)
                        .or_insert_with(|| Trinity::new(ps_gin.clone(), feeder_gin.clone(), cooler_gin.clone(), 1));
                }
            }
        }

        trinities.into_values().collect()
    }

    async fn ensure_all_in_one_placeholders(&self, orders: &HashMap<String, Vec<SalesLine>>) -> LoaderResult<()> {
        let has_all_in_one = orders.values().any(|lines| lines.iter().any(|l| l.gin == ALL_IN_ONE_POWER_SOURCE_GIN));
        if !has_all_in_one {
            return Ok(());
        }

        for (gin, category, label) in [
            (NO_FEEDER_GIN, Category::Feeder, "No Feeder Available - All-in-one unit"),
            (NO_COOLER_GIN, Category::Cooler, "No Cooler Available - All-in-one unit"),
        ] {
            let now = Utc::now().to_rfc3339();
            let cypher = "MERGE (p:Product {gin: $gin})
                ON CREATE SET p.name = $name, p.category = $category, p.description = $name,
                    p.is_available = true, p.sales_frequency = 0, p.countries_available = [],
                    p.specifications = '{}', p.created_at = $now, p.updated_at = $now";
            let query = Query::new(cypher.to_string())
                .param("gin", gin)
                .param("name", label)
                .param("category", category.as_str())
                .param("now", now);
            self.graph.execute_write(query).await?;
        }
        Ok(())
    }

    async fn write_transactions_and_customers(&self, orders: &HashMap<String, Vec<SalesLine>>) -> LoaderResult<()> {
        let mut customers: HashMap<String, CustomerAccum> = HashMap::new();
        for lines in orders.values() {
            for line in lines {
                if line.customer.is_empty() {
                    continue;
                }
                let accum = customers.entry(line.customer.clone()).or_default();
                if !line.facility.is_empty() {
                    accum.facilities.insert(line.facility.clone());
                }
                if !line.warehouse.is_empty() {
                    accum.warehouses.insert(line.warehouse.clone());
                }
                accum.categories.insert(line.category);
                accum.transaction_count += 1;
            }
        }
        for (name, accum) in &customers {
            self.write_customer(name, accum).await?;
        }
        for lines in orders.values() {
            for line in lines {
                self.write_transaction(line).await?;
            }
        }
        Ok(())
    }

    async fn write_customer(&self, name: &str, accum: &CustomerAccum) -> LoaderResult<()> {
        let facilities: Vec<String> = accum.facilities.iter().cloned().collect();
        let warehouses: Vec<String> = accum.warehouses.iter().cloned().collect();
        let categories: Vec<String> = accum.categories.iter().map(|c| c.as_str().to_string()).collect();

        let cypher = "MERGE (c:Customer {name: $name})
            SET c.primary_facility = $primary_facility,
                c.all_facilities = $all_facilities,
                c.all_warehouses = $all_warehouses,
                c.transaction_count = $transaction_count,
                c.product_categories = $product_categories,
                c.updated_at = $updated_at";
        let query = Query::new(cypher.to_string())
            .param("name", name.to_string())
            .param("primary_facility", facilities.first().cloned().unwrap_or_default())
            .param("all_facilities", facilities)
            .param("all_warehouses", warehouses)
            .param("transaction_count", accum.transaction_count as i64)
            .param("product_categories", categories)
            .param("updated_at", Utc::now().to_rfc3339());
        self.graph.execute_write(query).await?;
        Ok(())
    }

    async fn write_transaction(&self, line: &SalesLine) -> LoaderResult<()> {
        let now = Utc::now().to_rfc3339();
        let cypher = "MATCH (p:Product {gin: $gin})
            MERGE (t:Transaction {order_id: $order_id, line_no: $line_no})
            SET t.product_gin = $gin, t.description = $description, t.facility = $facility,
                t.warehouse = $warehouse, t.category = $category, t.customer = $customer,
                t.updated_at = $updated_at
            MERGE (t)-[:CONTAINS]->(p)";
        let query = Query::new(cypher.to_string())
            .param("gin", line.gin.clone())
            .param("order_id", line.order_id.clone())
            .param("line_no", line.line_no.clone())
            .param("description", line.description.clone())
            .param("facility", line.facility.clone())
            .param("warehouse", line.warehouse.clone())
            .param("category", line.category.as_str())
            .param("customer", line.customer.clone())
            .param("updated_at", now);
        self.graph.execute_write(query).await?;

        if !line.customer.is_empty() {
            let cypher = "MATCH (c:Customer {name: $customer})
                MATCH (t:Transaction {order_id: $order_id, line_no: $line_no})
                MERGE (c)-[:MADE]->(t)";
            let query = Query::new(cypher.to_string())
                .param("customer", line.customer.clone())
                .param("order_id", line.order_id.clone())
                .param("line_no", line.line_no.clone());
            self.graph.execute_write(query).await?;
        }
        Ok(())
    }

    async fn write_co_occurrences(&self, edges: &[CoOccurrenceEdge]) -> LoaderResult<()> {
        for edge in edges {
            let cypher = "MATCH (p1:Product {gin: $a})
                MATCH (p2:Product {gin: $b})
                MERGE (p1)-[r1:CO_OCCURS]->(p2)
                SET r1.frequency = $frequency, r1.orders_count = $orders_count,
                    r1.confidence_score = $confidence_score, r1.last_occurrence_date = $last_occurrence_date,
                    r1.sample_orders = $sample_orders, r1.updated_at = $updated_at
                MERGE (p2)-[r2:CO_OCCURS]->(p1)
                SET r2.frequency = $frequency, r2.orders_count = $orders_count,
                    r2.confidence_score = $confidence_score, r2.last_occurrence_date = $last_occurrence_date,
                    r2.sample_orders = $sample_orders, r2.updated_at = $updated_at";
            let query = Query::new(cypher.to_string())
                .param("a", edge.product_a.clone())
                .param("b", edge.product_b.clone())
                .param("frequency", edge.frequency as i64)
                .param("orders_count", edge.orders_count as i64)
                .param("confidence_score", edge.confidence_score as f64)
                .param("last_occurrence_date", edge.last_occurrence_date.to_rfc3339())
                .param("sample_orders", edge.sample_orders.clone())
                .param("updated_at", Utc::now().to_rfc3339());
            self.graph.execute_write(query).await?;
        }
        Ok(())
    }

    async fn load_determines(&self) -> LoaderResult<HashMap<String, HashMap<Category, Vec<String>>>> {
        let cypher = "MATCH (ps:Product {category: 'PowerSource'})-[:DETERMINES]->(comp:Product)
            RETURN ps.gin as ps_gin, comp.gin as comp_gin, comp.category as comp_category";
        let rows = self.graph.execute_query(Query::new(cypher.to_string())).await?;

        let mut map: HashMap<String, HashMap<Category, Vec<String>>> = HashMap::new();
        for row in rows {
            let ps_gin: String = row.get("ps_gin").unwrap_or_default();
            let comp_gin: String = row.get("comp_gin").unwrap_or_default();
            let comp_category_raw: String = row.get("comp_category").unwrap_or_default();
            map.entry(ps_gin)
                .or_default()
                .entry(Category::normalize(&comp_category_raw))
                .or_default()
                .push(comp_gin);
        }
        Ok(map)
    }

    async fn write_trinities(&self, trinities: &[Trinity]) -> LoaderResult<()> {
        for trinity in trinities {
            let now = Utc::now().to_rfc3339();
            let cypher = "MERGE (t:Trinity {trinity_id: $trinity_id})
                ON CREATE SET t.power_source_gin = $ps_gin, t.feeder_gin = $feeder_gin,
                    t.cooler_gin = $cooler_gin, t.observed_order_count = $count, t.created_at = $now
                ON MATCH SET t.observed_order_count = t.observed_order_count + $count, t.updated_at = $now";
            let query = Query::new(cypher.to_string())
                .param("trinity_id", trinity.trinity_id.clone())
                .param("ps_gin", trinity.power_source_gin.clone())
                .param("feeder_gin", trinity.feeder_gin.clone())
                .param("cooler_gin", trinity.cooler_gin.clone())
                .param("count", trinity.observed_order_count as i64)
                .param("now", now);
            self.graph.execute_write(query).await?;
        }
        Ok(())
    }
}

fn find_compatible(
    ps_gin: &str,
    available: &[String],
    category: Category,
    determines: &HashMap<String, HashMap<Category, Vec<String>>>,
) -> Option<String> {
    let required = determines.get(ps_gin).and_then(|m| m.get(&category))?;
    available.iter().find(|gin| required.contains(gin)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(order: &str, gin: &str, category: Category) -> SalesLine {
        SalesLine {
            order_id: order.to_string(),
            line_no: "1".to_string(),
            gin: gin.to_string(),
            description: String::new(),
            customer: String::new(),
            facility: String::new(),
            warehouse: String::new(),
            category,
        }
    }

    #[test]
    fn all_in_one_order_gets_synthetic_feeder_and_cooler() {
        let mut orders = HashMap::new();
        orders.insert(
            "order-1".to_string(),
            vec![line("order-1", ALL_IN_ONE_POWER_SOURCE_GIN, Category::PowerSource)],
        );
        let enhanced = SalesLoader::enhance_all_in_one_orders(orders);
        let lines = &enhanced["order-1"];
        assert!(lines.iter().any(|l| l.gin == NO_FEEDER_GIN));
        assert!(lines.iter().any(|l| l.gin == NO_COOLER_GIN));
    }

    #[test]
    fn order_without_all_in_one_powersource_is_untouched() {
        let mut orders = HashMap::new();
        orders.insert("order-2".to_string(), vec![line("order-2", "1234567890", Category::PowerSource)]);
        let enhanced = SalesLoader::enhance_all_in_one_orders(orders);
        assert_eq!(enhanced["order-2"].len(), 1);
    }

    #[test]
    fn co_occurrence_confidence_is_relative_to_max_frequency() {
        let mut orders = HashMap::new();
        orders.insert("o1".to_string(), vec![line("o1", "a", Category::Accessory), line("o1", "b", Category::Accessory)]);
        orders.insert("o2".to_string(), vec![line("o2", "a", Category::Accessory), line("o2", "b", Category::Accessory)]);
        orders.insert("o3".to_string(), vec![line("o3", "a", Category::Accessory), line("o3", "c", Category::Accessory)]);

        let edges = SalesLoader::calculate_co_occurrences(&orders);
        let ab = edges.iter().find(|e| e.product_a == "a" && e.product_b == "b").expect("a-b edge");
        assert_eq!(ab.frequency, 2);
        assert_eq!(ab.confidence_score, 1.0);

        let ac = edges.iter().find(|e| e.product_a == "a" && e.product_b == "c").expect("a-c edge");
        assert_eq!(ac.frequency, 1);
        assert_eq!(ac.confidence_score, 0.5);
    }

    #[test]
    fn single_item_order_produces_no_co_occurrence() {
        let mut orders = HashMap::new();
        orders.insert("solo".to_string(), vec![line("solo", "a", Category::Accessory)]);
        assert!(SalesLoader::calculate_co_occurrences(&orders).is_empty());
    }

    #[test]
    fn trinity_forms_only_when_feeder_and_cooler_are_determined() {
        let mut orders = HashMap::new();
        orders.insert(
            "order-3".to_string(),
            vec![
                line("order-3", "ps1", Category::PowerSource),
                line("order-3", "fd1", Category::Feeder),
                line("order-3", "cl1", Category::Cooler),
            ],
        );
        let mut determines: HashMap<String, HashMap<Category, Vec<String>>> = HashMap::new();
        determines.entry("ps1".to_string()).or_default().insert(Category::Feeder, vec!["fd1".to_string()]);
        determines.entry("ps1".to_string()).or_default().insert(Category::Cooler, vec!["cl1".to_string()]);

        let trinities = SalesLoader::derive_trinities(&orders, &determines);
        assert_eq!(trinities.len(), 1);
        assert_eq!(trinities[0].power_source_gin, "ps1");
    }

    #[test]
    fn trinity_is_skipped_without_determined_compatibility() {
        let mut orders = HashMap::new();
        orders.insert(
            "order-4".to_string(),
            vec![
                line("order-4", "ps1", Category::PowerSource),
                line("order-4", "fd2", Category::Feeder),
                line("order-4", "cl2", Category::Cooler),
            ],
        );
        let determines: HashMap<String, HashMap<Category, Vec<String>>> = HashMap::new();
        assert!(SalesLoader::derive_trinities(&orders, &determines).is_empty());
    }
}

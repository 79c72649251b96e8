//! Trinity and GoldenPackage lookups (§3 Glossary, §4.6.2, §4.6.4).
//!
//! `Trinity` and `GoldenPackage` nodes carry their member gins directly as
//! properties rather than relationships, so these queries join back to
//! `Product` by gin rather than traversing a `COMPRISES` edge.

use neo4rs::Query;
use wr_core::{Category, Trinity};

use crate::client::GraphClient;
use crate::error::GraphResult;
use crate::product::{row_to_product, PRODUCT_RETURN_FIELDS};
use crate::queries::algorithms::{fetch_product_by_gin, ScoredProduct};

/// A Trinity joined to a vector-similarity score against its PowerSource.
#[derive(Debug, Clone)]
pub struct ScoredTrinity {
    pub trinity: Trinity,
    pub score: f64,
}

/// The three materialized members of a Trinity, keyed by category.
#[derive(Debug, Clone)]
pub struct TrinityMembers {
    pub power_source: wr_core::Product,
    pub feeder: wr_core::Product,
    pub cooler: wr_core::Product,
}

fn row_to_trinity(row: &neo4rs::Row) -> GraphResult<Trinity> {
    use crate::error::GraphError;
    Ok(Trinity {
        trinity_id: row.get("trinity_id").map_err(|_| GraphError::MissingField("trinity_id".into()))?,
        power_source_gin: row
            .get("power_source_gin")
            .map_err(|_| GraphError::MissingField("power_source_gin".into()))?,
        feeder_gin: row.get("feeder_gin").map_err(|_| GraphError::MissingField("feeder_gin".into()))?,
        cooler_gin: row.get("cooler_gin").map_err(|_| GraphError::MissingField("cooler_gin".into()))?,
        observed_order_count: row.get::<i64>("observed_order_count").unwrap_or(0).max(0) as u32,
    })
}

/// Trinity-first semantic path (§4.6.2 step 2): ranks every Trinity by the
/// vector-index similarity of its PowerSource to `embedding`, keeping the
/// top-K.
pub async fn search_trinities_by_embedding(
    client: &GraphClient,
    embedding: &[f32],
    limit: usize,
) -> GraphResult<Vec<ScoredTrinity>> {
    let query = Query::new(
        "CALL db.index.vector.queryNodes('product_embeddings', $k, $embedding)
         YIELD node as ps, score
         WHERE ps.category = 'PowerSource'
         MATCH (t:Trinity {power_source_gin: ps.gin})
         RETURN t.trinity_id as trinity_id, t.power_source_gin as power_source_gin,
                t.feeder_gin as feeder_gin, t.cooler_gin as cooler_gin,
                t.observed_order_count as observed_order_count, score
         ORDER BY score DESC
         LIMIT $limit"
            .to_string(),
    )
    .param("k", (limit * 5).max(limit) as i64)
    .param("embedding", embedding.to_vec())
    .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| {
            let score: f64 = row.get("score").unwrap_or(0.0);
            row_to_trinity(&row).map(|trinity| ScoredTrinity { trinity, score })
        })
        .collect()
}

/// Product-specific fallback (§4.6.2 step 4): Trinities whose PowerSource
/// name contains `name_substr`.
pub async fn trinities_by_power_source_name(
    client: &GraphClient,
    name_substr: &str,
    limit: usize,
) -> GraphResult<Vec<Trinity>> {
    let query = Query::new(
        "MATCH (ps:Product {category: 'PowerSource'})
         WHERE toLower(ps.name) CONTAINS toLower($name_substr)
         MATCH (t:Trinity {power_source_gin: ps.gin})
         RETURN t.trinity_id as trinity_id, t.power_source_gin as power_source_gin,
                t.feeder_gin as feeder_gin, t.cooler_gin as cooler_gin,
                t.observed_order_count as observed_order_count
         LIMIT $limit"
            .to_string(),
    )
    .param("name_substr", name_substr)
    .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.iter().map(row_to_trinity).collect()
}

/// Materializes a Trinity's three members by gin. Issued as three focused
/// lookups rather than one multi-alias `RETURN`, since `row_to_product`
/// expects a single flat field set per row.
pub async fn trinity_members(client: &GraphClient, trinity: &Trinity) -> GraphResult<Option<TrinityMembers>> {
    let power_source = fetch_product_by_gin(client, &trinity.power_source_gin).await?;
    let feeder = fetch_product_by_gin(client, &trinity.feeder_gin).await?;
    let cooler = fetch_product_by_gin(client, &trinity.cooler_gin).await?;

    match (power_source, feeder, cooler) {
        (Some(power_source), Some(feeder), Some(cooler)) => {
            Ok(Some(TrinityMembers { power_source, feeder, cooler }))
        }
        _ => Ok(None),
    }
}

/// Products that co-occur with all three Trinity members but are not
/// themselves one of them, ranked by combined co-occurrence confidence
/// (§4.6.2 step 3 accessory selection).
pub async fn trinity_accessories(
    client: &GraphClient,
    trinity: &Trinity,
    limit: usize,
) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "MATCH (member:Product)-[r:CO_OCCURS]-(accessory:Product)
         WHERE member.gin IN [$ps_gin, $f_gin, $c_gin]
           AND NOT accessory.gin IN [$ps_gin, $f_gin, $c_gin]
         WITH accessory as p, sum(r.confidence_score) as score
         RETURN {PRODUCT_RETURN_FIELDS}, score
         ORDER BY score DESC
         LIMIT $limit"
    );

    let query = Query::new(cypher)
        .param("ps_gin", trinity.power_source_gin.clone())
        .param("f_gin", trinity.feeder_gin.clone())
        .param("c_gin", trinity.cooler_gin.clone())
        .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| {
            let score: f64 = row.get("score").unwrap_or(0.0);
            row_to_product(&row).map(|product| ScoredProduct { product, score })
        })
        .collect()
}

/// The most sales-frequent `COMPATIBLE_WITH` Feeder or Cooler for a given
/// PowerSource — the expert-package trinity seed of §4.6.4 step 3.
pub async fn most_compatible_by_sales(
    client: &GraphClient,
    ps_gin: &str,
    category: Category,
) -> GraphResult<Option<wr_core::Product>> {
    let cypher = format!(
        "MATCH (ps:Product {{gin: $ps_gin}})-[:COMPATIBLE_WITH]-(target:Product {{category: $category}})
         WITH target as p
         RETURN {PRODUCT_RETURN_FIELDS}
         ORDER BY p.sales_frequency DESC
         LIMIT 1"
    );

    let query = Query::new(cypher).param("ps_gin", ps_gin).param("category", category.as_str());

    let rows = client.execute_query(query).await?;
    match rows.into_iter().next() {
        Some(row) => Ok(Some(row_to_product(&row)?)),
        None => Ok(None),
    }
}

/// Products most frequently co-ordered with the three given trinity gins,
/// excluding the trinity itself — feeds the expert-package "fill to 7
/// categories" step (§4.6.4 step 3).
pub async fn co_ordered_with_trinity(
    client: &GraphClient,
    trinity_gins: &[String],
    limit: usize,
) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "MATCH (member:Product)-[r:CO_OCCURS]-(other:Product)
         WHERE member.gin IN $trinity_gins AND NOT other.gin IN $trinity_gins
         WITH other as p, sum(r.frequency) as freq
         RETURN {PRODUCT_RETURN_FIELDS}, freq
         ORDER BY freq DESC
         LIMIT $limit"
    );

    let query = Query::new(cypher).param("trinity_gins", trinity_gins.to_vec()).param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| {
            let freq: i64 = row.get("freq").unwrap_or(0);
            row_to_product(&row).map(|product| ScoredProduct { product, score: freq as f64 })
        })
        .collect()
}

/// Raw gin list of a GoldenPackage for a given PowerSource, if one exists
/// (§4.6.4 step 3 fallback fill).
pub async fn golden_package_gins(client: &GraphClient, ps_gin: &str) -> GraphResult<Vec<String>> {
    let query = Query::new(
        "MATCH (g:GoldenPackage {power_source_gin: $ps_gin}) RETURN g.product_gins as gins".to_string(),
    )
    .param("ps_gin", ps_gin);

    let rows = client.execute_query(query).await?;
    match rows.into_iter().next() {
        Some(row) => Ok(row.get::<Vec<String>>("gins").unwrap_or_default()),
        None => Ok(Vec::new()),
    }
}

//! Graph algorithm operations over the product catalog (§4.3): vector
//! similarity, a vector+popularity hybrid, shortest path between two
//! products, co-occurrence "popular with" ranking, and a lightweight
//! degree-centrality approximation.

use neo4rs::Query;
use wr_core::Category;

use crate::client::GraphClient;
use crate::error::GraphResult;
use crate::product::{row_to_product, PRODUCT_RETURN_FIELDS};

#[derive(Debug, Clone)]
pub struct ScoredProduct {
    pub product: wr_core::Product,
    pub score: f64,
}

/// `CALL db.index.vector.queryNodes('product_embeddings', ...)` nearest
/// neighbors to `embedding`, optionally constrained to `category`.
pub async fn vector_search(
    client: &GraphClient,
    embedding: &[f32],
    category: Option<Category>,
    limit: usize,
) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "CALL db.index.vector.queryNodes('product_embeddings', $k, $embedding)
         YIELD node as p, score
         WHERE ($category IS NULL OR p.category = $category)
         RETURN {PRODUCT_RETURN_FIELDS}, score
         ORDER BY score DESC
         LIMIT $limit"
    );

    let query = Query::new(cypher)
        .param("k", (limit * 4).max(limit) as i64)
        .param("embedding", embedding.to_vec())
        .param("category", category.map(|c| c.as_str().to_string()))
        .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| {
            let score: f64 = row.get("score").unwrap_or(0.0);
            row_to_product(&row).map(|product| ScoredProduct { product, score })
        })
        .collect()
}

/// Vector similarity blended with normalized sales frequency — the hybrid
/// signal used when a query names a concrete product family rather than a
/// pure semantic description.
pub async fn hybrid_search(
    client: &GraphClient,
    embedding: &[f32],
    category: Option<Category>,
    vector_weight: f64,
    limit: usize,
) -> GraphResult<Vec<ScoredProduct>> {
    let candidates = vector_search(client, embedding, category, (limit * 3).max(limit)).await?;
    if candidates.is_empty() {
        return Ok(candidates);
    }

    let max_sales = candidates
        .iter()
        .map(|c| c.product.sales_frequency)
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut blended: Vec<ScoredProduct> = candidates
        .into_iter()
        .map(|c| {
            let popularity = c.product.sales_frequency as f64 / max_sales;
            let score = vector_weight * c.score + (1.0 - vector_weight) * popularity;
            ScoredProduct { product: c.product, score }
        })
        .collect();

    blended.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    blended.truncate(limit);
    Ok(blended)
}

/// Shortest `COMPATIBLE_WITH`/`DETERMINES` path between two products, for
/// explaining why two items were recommended together.
pub async fn shortest_path(client: &GraphClient, from_gin: &str, to_gin: &str) -> GraphResult<Vec<String>> {
    let query = Query::new(
        "MATCH (a:Product {gin: $from}), (b:Product {gin: $to}),
         path = shortestPath((a)-[:COMPATIBLE_WITH|DETERMINES*..5]-(b))
         RETURN [n IN nodes(path) | n.gin] as gins"
            .to_string(),
    )
    .param("from", from_gin)
    .param("to", to_gin);

    let rows = client.execute_query(query).await?;
    match rows.into_iter().next() {
        Some(row) => Ok(row.get::<Vec<String>>("gins").unwrap_or_default()),
        None => Ok(Vec::new()),
    }
}

/// Products most frequently `CO_OCCURS` with `gin`, a cheap stand-in for
/// full PageRank that only needs one-hop aggregate frequency.
pub async fn pagerank_popular(client: &GraphClient, gin: &str, limit: usize) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "MATCH (p:Product {{gin: $gin}})-[r:CO_OCCURS]-(other:Product)
         WITH other as p, r.confidence_score as score
         RETURN {PRODUCT_RETURN_FIELDS}, score
         ORDER BY score DESC
         LIMIT $limit"
    );

    let query = Query::new(cypher).param("gin", gin).param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| {
            let score: f64 = row.get("score").unwrap_or(0.0);
            row_to_product(&row).map(|product| ScoredProduct { product, score })
        })
        .collect()
}

/// Products of `category` reachable from `from_gin` within `max_hops` over
/// `COMPATIBLE_WITH|CO_OCCURS`, ordered by hop distance then sales
/// frequency — the per-PowerSource feeder/cooler candidate search of
/// §4.6.3 (graph-focused and hybrid strategies alike).
pub async fn compatible_in_category(
    client: &GraphClient,
    from_gin: &str,
    category: Category,
    max_hops: u32,
    limit: usize,
) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "MATCH (start:Product {{gin: $from}})
         MATCH path = (start)-[:COMPATIBLE_WITH|CO_OCCURS*1..{max_hops}]-(target:Product {{category: $category}})
         WITH target as p, min(length(path)) as hops
         RETURN {PRODUCT_RETURN_FIELDS}, hops
         ORDER BY hops ASC, p.sales_frequency DESC
         LIMIT $limit"
    );

    let query = Query::new(cypher)
        .param("from", from_gin)
        .param("category", category.as_str())
        .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| {
            let hops: i64 = row.get("hops").unwrap_or(1);
            let score = 1.0 / (1.0 + hops as f64);
            row_to_product(&row).map(|product| ScoredProduct { product, score })
        })
        .collect()
}

/// Products of `category` reachable from `from_gin` via a direct
/// `DETERMINES` edge — the hard candidate filter of §4.6.3: when a
/// PowerSource determines a category, only the determined products are
/// eligible, `COMPATIBLE_WITH` never substitutes for this restriction.
pub async fn determines_in_category(
    client: &GraphClient,
    from_gin: &str,
    category: Category,
    limit: usize,
) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "MATCH (start:Product {{gin: $from}})-[:DETERMINES]->(target:Product {{category: $category}})
         WITH target as p
         RETURN {PRODUCT_RETURN_FIELDS}
         ORDER BY p.sales_frequency DESC
         LIMIT $limit"
    );

    let query = Query::new(cypher)
        .param("from", from_gin)
        .param("category", category.as_str())
        .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| row_to_product(&row).map(|product| ScoredProduct { product, score: 1.0 }))
        .collect()
}

/// Plain category search ordered by sales frequency — the last-resort
/// candidate source when both product-specific and graph-traversal
/// searches come back empty (§4.6.6).
pub async fn category_by_sales(client: &GraphClient, category: Category, limit: usize) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "MATCH (p:Product {{category: $category}})
         RETURN {PRODUCT_RETURN_FIELDS}
         ORDER BY p.sales_frequency DESC, p.name ASC
         LIMIT $limit"
    );

    let query = Query::new(cypher).param("category", category.as_str()).param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    rows.into_iter()
        .map(|row| row_to_product(&row).map(|product| ScoredProduct { product, score: 0.5 }))
        .collect()
}

/// Fetches a single `Product` by gin, or `None` if it doesn't exist.
pub async fn fetch_product_by_gin(client: &GraphClient, gin: &str) -> GraphResult<Option<wr_core::Product>> {
    let cypher = format!("MATCH (p:Product {{gin: $gin}}) RETURN {PRODUCT_RETURN_FIELDS}");
    let query = Query::new(cypher).param("gin", gin);
    let rows = client.execute_query(query).await?;
    match rows.into_iter().next() {
        Some(row) => Ok(Some(row_to_product(&row)?)),
        None => Ok(None),
    }
}

/// Degree centrality within a category: number of `COMPATIBLE_WITH` edges
/// touching each product, normalized to `[0,1]` by the category maximum.
/// Used as a tie-breaker signal, not a ranking driver on its own.
pub async fn centrality(client: &GraphClient, category: Category, limit: usize) -> GraphResult<Vec<ScoredProduct>> {
    let cypher = format!(
        "MATCH (p:Product {{category: $category}})
         OPTIONAL MATCH (p)-[r:COMPATIBLE_WITH]-()
         WITH p, count(r) as degree
         RETURN {PRODUCT_RETURN_FIELDS}, degree
         ORDER BY degree DESC
         LIMIT $limit"
    );

    let query = Query::new(cypher)
        .param("category", category.as_str())
        .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    let scored: Vec<(wr_core::Product, i64)> = rows
        .into_iter()
        .map(|row| {
            let degree: i64 = row.get("degree").unwrap_or(0);
            row_to_product(&row).map(|product| (product, degree))
        })
        .collect::<GraphResult<Vec<_>>>()?;

    let max_degree = scored.iter().map(|(_, d)| *d).max().unwrap_or(0).max(1) as f64;
    Ok(scored
        .into_iter()
        .map(|(product, degree)| ScoredProduct {
            product,
            score: degree as f64 / max_degree,
        })
        .collect())
}

//! Generic fuzzy product-name search (C4, §4.4).
//!
//! Two-stage algorithm: a cheap shortlist query on the first search token,
//! ordered by sales frequency, followed by in-memory scoring of the
//! remaining tokens against each shortlisted name.

use neo4rs::Query;
use serde::Serialize;
use wr_core::Category;

use crate::client::GraphClient;
use crate::error::GraphResult;

#[derive(Debug, Clone, Serialize)]
pub struct ProductSearchResult {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Option<f64>,
    pub sales_frequency: u32,
    pub description: String,
    pub match_type: &'static str,
    pub match_score: f64,
}

struct ShortlistRow {
    product_id: String,
    product_name: String,
    category: String,
    subcategory: Option<String>,
    price: Option<f64>,
    sales_frequency: u32,
    description: String,
}

/// Main entry point: fuzzy-match `product_name` within `category`.
pub async fn search_products(
    client: &GraphClient,
    product_name: &str,
    category: Category,
    limit: usize,
) -> GraphResult<Vec<ProductSearchResult>> {
    let words = parse_search_terms(product_name);
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let first_word = &words[0];
    let other_words = &words[1..];

    let shortlist = shortlist_by_first_word(client, first_word, category, limit * 2).await?;
    if shortlist.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(ShortlistRow, &'static str, f64)> = if other_words.is_empty() {
        shortlist.into_iter().map(|row| (row, "exact", 1.0)).collect()
    } else {
        shortlist
            .into_iter()
            .filter_map(|row| {
                let (match_type, score) = check_word_combinations(&row.product_name.to_lowercase(), other_words)?;
                Some((row, match_type, score))
            })
            .collect()
    };

    scored.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.0.sales_frequency.cmp(&a.0.sales_frequency))
    });
    scored.truncate(limit);

    Ok(scored
        .into_iter()
        .map(|(row, match_type, match_score)| ProductSearchResult {
            product_id: row.product_id,
            product_name: row.product_name,
            category: row.category,
            subcategory: row.subcategory,
            price: row.price,
            sales_frequency: row.sales_frequency,
            description: row.description,
            match_type,
            match_score,
        })
        .collect())
}

/// Lowercase, whitespace-split, dropping tokens shorter than 2 chars
/// unless they are purely numeric (keeps single-digit model suffixes).
fn parse_search_terms(product_name: &str) -> Vec<String> {
    product_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() >= 2 || w.chars().all(|c| c.is_ascii_digit()))
        .map(|w| w.to_string())
        .collect()
}

/// Stage 1: cheap shortlist on the first token, ordered by sales frequency
/// then name, so ties favor the better-selling product.
async fn shortlist_by_first_word(
    client: &GraphClient,
    first_word: &str,
    category: Category,
    limit: usize,
) -> GraphResult<Vec<ShortlistRow>> {
    let query = Query::new(
        "MATCH (p:Product)
         WHERE p.category = $category
         AND toLower(p.name) CONTAINS toLower($first_word)
         RETURN p.gin as product_id, p.name as product_name, p.category as category,
                p.subcategory as subcategory, p.price as price,
                p.sales_frequency as sales_frequency, p.description as description
         ORDER BY p.sales_frequency DESC, p.name ASC
         LIMIT $limit"
            .to_string(),
    )
    .param("category", category.as_str())
    .param("first_word", first_word)
    .param("limit", limit as i64);

    let rows = client.execute_query(query).await?;
    Ok(rows
        .into_iter()
        .map(|row| ShortlistRow {
            product_id: row.get("product_id").unwrap_or_default(),
            product_name: row.get("product_name").unwrap_or_default(),
            category: row.get("category").unwrap_or_default(),
            subcategory: row.get("subcategory").ok(),
            price: row.get::<f64>("price").ok(),
            sales_frequency: row.get::<i64>("sales_frequency").unwrap_or(0).max(0) as u32,
            description: row.get("description").unwrap_or_default(),
        })
        .collect())
}

/// Stage 2: check the remaining tokens against a candidate name in
/// priority order — concatenated, spaced, all-present, partial combination.
fn check_word_combinations(product_name_lower: &str, other_words: &[String]) -> Option<(&'static str, f64)> {
    let concatenated = other_words.concat();
    if product_name_lower.contains(&concatenated) {
        return Some(("concatenated", 1.0));
    }

    let spaced = other_words.join(" ");
    if product_name_lower.contains(&spaced) {
        return Some(("spaced", 0.9));
    }

    if other_words.iter().all(|w| product_name_lower.contains(w.as_str())) {
        return Some(("individual", 0.8));
    }

    if other_words.len() >= 2 {
        let total_combinations = other_words.len() - 1;
        let partial_matches = other_words
            .windows(2)
            .filter(|pair| product_name_lower.contains(&pair.concat()))
            .count();

        if partial_matches > 0 {
            let score = 0.6 + (partial_matches as f64 / total_combinations as f64) * 0.2;
            return Some(("partial", score));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_terms_keeps_numeric_tokens_and_drops_single_letter_words() {
        let terms = parse_search_terms("Warrior 400 i");
        assert_eq!(terms, vec!["warrior", "400"]);
    }

    #[test]
    fn concatenated_beats_spaced_beats_individual() {
        assert_eq!(
            check_word_combinations("warrior 400i mig welder", &["400".to_string(), "i".to_string()]),
            Some(("concatenated", 1.0))
        );
        assert_eq!(
            check_word_combinations("warrior 400 i mig welder", &["400".to_string(), "i".to_string()]),
            Some(("spaced", 0.9))
        );
        assert_eq!(
            check_word_combinations("warrior i400 mig welder", &["400".to_string(), "i".to_string()]),
            Some(("individual", 0.8))
        );
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(
            check_word_combinations("renegade 300", &["400".to_string(), "i".to_string()]),
            None
        );
    }
}

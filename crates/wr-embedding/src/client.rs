//! HTTP client for a local sentence-embedding server (§4.2), grounded in
//! the teacher's Ollama client shape but sized to `all-MiniLM-L6-v2`'s
//! 384-dim cosine space instead of `nomic-embed-text`'s 768.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wr_core::{DomainVocabulary, Product, EMBEDDING_DIM};

use crate::enrich::{build_product_text, clean_query_text};
use crate::error::{EmbeddingError, EmbeddingResult};

pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:8001";
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMBEDDING_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Client for `POST /embed {model, text} -> {embedding: [f32; 384]}`.
#[derive(Clone)]
pub struct EmbeddingClient {
    base_url: String,
    model: String,
    http: reqwest::Client,
}

impl EmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            http,
        }
    }

    /// Builds the enriched product text via `wr_core::DomainVocabulary::enhance`
    /// and embeds it (§4.2 `embed_product`).
    pub async fn embed_product(&self, product: &Product, vocabulary: &DomainVocabulary) -> EmbeddingResult<(Vec<f32>, String)> {
        let text = build_product_text(product, vocabulary);
        let embedding = self.embed_text(&text).await?;
        Ok((embedding, text))
    }

    /// Cleans and enhances query text before embedding (§4.2 `embed_query`).
    pub async fn embed_query(&self, query_text: &str, vocabulary: &DomainVocabulary) -> EmbeddingResult<Vec<f32>> {
        let cleaned = clean_query_text(query_text);
        let enhanced = vocabulary.enhance(&cleaned);
        self.embed_text(&enhanced).await
    }

    async fn embed_text(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let request = EmbedRequest { model: &self.model, text };

        let response = self
            .http
            .post(format!("{}/embed", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Connect(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServerError { status, body });
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Decode(e.to_string()))?;

        if parsed.embedding.len() != EMBEDDING_DIM {
            return Err(EmbeddingError::DimensionMismatch {
                expected: EMBEDDING_DIM,
                actual: parsed.embedding.len(),
            });
        }

        debug!(dim = parsed.embedding.len(), "generated embedding");
        Ok(parsed.embedding)
    }

    /// Check the embedding server is reachable.
    pub async fn health_check(&self) -> bool {
        self.http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

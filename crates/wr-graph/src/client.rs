//! Neo4j connection client (C3, §4.3).

use std::time::Duration;

use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{GraphError, GraphResult};

/// Connection parameters for the graph store, loaded from the required
/// environment variables listed in §6.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Bounded connection pool size (§5 default ~50).
    pub max_connections: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            max_connections: 50,
        }
    }
}

/// Read-only (at request time) client for the knowledge graph.
///
/// Writes are performed only by the data loader (§5 "Write path"); the
/// serving core only ever calls `execute_query` / the algorithm helpers.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

const TRANSIENT_RETRY_ATTEMPTS: usize = 3;
const TRANSIENT_RETRY_BASE: Duration = Duration::from_millis(200);

impl GraphClient {
    /// Connect and immediately ping with `RETURN 1`.
    ///
    /// `neo4rs` uses a lazy pool — `Graph::connect` only builds the pool
    /// object and does not establish a real bolt connection. Pinging here
    /// means a caller wrapping this in a timeout gets a fast failure when
    /// the store is unreachable, instead of discovering it on the first
    /// real query mid-request.
    pub async fn connect(config: &GraphConfig) -> GraphResult<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.clone())
            .max_connections(config.max_connections)
            .fetch_size(200)
            .build()
            .map_err(|e| GraphError::Connect(e.to_string()))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphError::Connect(e.to_string()))?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| GraphError::Connect(format!("graph store not responding: {e}")))?;

        Ok(Self { graph })
    }

    /// Execute a parameterized query that returns no results (§4.3
    /// `execute_write`). User input must always travel through `params`,
    /// never string concatenation.
    pub async fn execute_write(&self, query: Query) -> GraphResult<()> {
        self.with_transient_retry(|| async { self.graph.run(query.clone()).await })
            .await?;
        Ok(())
    }

    /// Execute a parameterized query and collect all rows (§4.3
    /// `execute_query`).
    pub async fn execute_query(&self, query: Query) -> GraphResult<Vec<neo4rs::Row>> {
        let mut result = self
            .with_transient_retry(|| async { self.graph.execute(query.clone()).await })
            .await?;

        let mut rows = Vec::new();
        while let Ok(Some(row)) = result.next().await {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query and return a single scalar field from the first row.
    pub async fn query_scalar<T: DeserializeOwned>(
        &self,
        query: Query,
        field: &str,
    ) -> GraphResult<Option<T>> {
        let rows = self.execute_query(query).await?;
        match rows.into_iter().next() {
            Some(row) => {
                let val: T = row
                    .get(field)
                    .map_err(|_| GraphError::MissingField(field.to_string()))?;
                Ok(Some(val))
            }
            None => Ok(None),
        }
    }

    /// Batch write with exponential-backoff retry on transient failures
    /// (§5, §7 `TransientStoreError`: up to 3 attempts before surfacing).
    async fn with_transient_retry<F, Fut, T>(&self, f: F) -> GraphResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, neo4rs::Error>>,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < TRANSIENT_RETRY_ATTEMPTS => {
                    let delay = TRANSIENT_RETRY_BASE * 2u32.pow(attempt as u32);
                    warn!(attempt, %e, "transient graph store error, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(GraphError::Transient(e.to_string())),
            }
        }
    }

    /// Health check: connectivity plus presence of the `product_embeddings`
    /// vector index (§4.3).
    pub async fn health(&self) -> GraphResult<()> {
        self.execute_query(Query::new("RETURN 1".to_string())).await?;

        let rows = self
            .execute_query(Query::new("SHOW INDEXES YIELD name".to_string()))
            .await?;
        let has_index = rows.iter().any(|row| {
            row.get::<String>("name")
                .map(|name| name == "product_embeddings")
                .unwrap_or(false)
        });

        if !has_index {
            return Err(GraphError::MissingIndex("product_embeddings".to_string()));
        }
        Ok(())
    }

    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

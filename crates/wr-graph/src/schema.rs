//! Neo4j schema initialization: uniqueness constraints and the
//! `product_embeddings` vector index (§3, §6).

use neo4rs::Query;
use tracing::info;
use wr_core::EMBEDDING_DIM;

use crate::client::GraphClient;
use crate::error::GraphResult;

/// Cypher statements for schema initialization. Safe to run repeatedly —
/// every statement uses `IF NOT EXISTS`.
fn schema_statements() -> Vec<String> {
    vec![
        "CREATE CONSTRAINT product_gin IF NOT EXISTS FOR (p:Product) REQUIRE p.gin IS UNIQUE".to_string(),
        "CREATE CONSTRAINT customer_name IF NOT EXISTS FOR (c:Customer) REQUIRE c.name IS UNIQUE".to_string(),
        "CREATE CONSTRAINT trinity_id IF NOT EXISTS FOR (t:Trinity) REQUIRE t.trinity_id IS UNIQUE"
            .to_string(),
        "CREATE CONSTRAINT golden_package_ps IF NOT EXISTS FOR (g:GoldenPackage) REQUIRE g.power_source_gin IS UNIQUE"
            .to_string(),
        format!(
            "CREATE VECTOR INDEX product_embeddings IF NOT EXISTS \
             FOR (p:Product) ON (p.embedding) \
             OPTIONS {{indexConfig: {{`vector.dimensions`: {EMBEDDING_DIM}, `vector.similarity_function`: 'cosine'}}}}"
        ),
    ]
}

/// Initialize schema. Called once at startup by the data loader, never by
/// the serving core (§5 "Write path: only the data loader performs writes").
pub async fn initialize_schema(client: &GraphClient) -> GraphResult<()> {
    info!("initializing graph schema");

    let statements = schema_statements();
    for statement in &statements {
        client.execute_write(Query::new(statement.clone())).await?;
    }

    info!(count = statements.len(), "graph schema initialized");
    Ok(())
}

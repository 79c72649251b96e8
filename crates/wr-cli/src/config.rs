//! Startup configuration (§6): every value here comes from an
//! environment variable. A required variable that's missing or
//! unparseable is a fatal `CoreError::Config` — never a per-request
//! failure (§7).

use wr_core::{CoreError, CoreResult};
use wr_db::RelationalStoreConfig;
use wr_embedding::EmbeddingConfig;
use wr_graph::GraphConfig;
use wr_intent::llm::LlmConfig;

pub struct AppConfig {
    pub graph: GraphConfig,
    pub relational: RelationalStoreConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub welding_processes_path: std::path::PathBuf,
    pub mode_detection_path: std::path::PathBuf,
}

impl AppConfig {
    pub fn from_env() -> CoreResult<Self> {
        let graph = GraphConfig {
            uri: required_env("NEO4J_URI")?,
            user: required_env("NEO4J_USER")?,
            password: required_env("NEO4J_PASSWORD")?,
            database: env_or("NEO4J_DATABASE", "neo4j"),
            max_connections: env_parsed_or("NEO4J_MAX_CONNECTIONS", 50)?,
        };

        let relational = RelationalStoreConfig {
            host: required_env("POSTGRES_HOST")?,
            port: env_parsed_or("POSTGRES_PORT", 5432)?,
            database: required_env("POSTGRES_DB")?,
            user: required_env("POSTGRES_USER")?,
            password: required_env("POSTGRES_PASSWORD")?,
            min_connections: env_parsed_or("POSTGRES_MIN_CONNECTIONS", 5)?,
            max_connections: env_parsed_or("POSTGRES_MAX_CONNECTIONS", 20)?,
        };

        let embedding = EmbeddingConfig {
            base_url: env_or("EMBEDDING_BASE_URL", wr_embedding::DEFAULT_EMBEDDING_URL),
            model: env_or("EMBEDDING_MODEL", wr_embedding::DEFAULT_MODEL),
            timeout_secs: env_parsed_or("EMBEDDING_TIMEOUT_SECS", 30)?,
        };

        let llm = LlmConfig {
            model: env_or("LLM_MODEL", wr_intent::llm::DEFAULT_MODEL),
            api_key: Some(required_env("LLM_API_KEY")?),
            base_url: std::env::var("LLM_BASE_URL").ok(),
            timeout_secs: env_parsed_or("LLM_TIMEOUT_SECS", 20)?,
        };

        let welding_processes_path = env_or("WELDING_PROCESSES_CONFIG", "config/welding_processes.yaml").into();
        let mode_detection_path = env_or("MODE_DETECTION_CONFIG", "config/mode_detection.yaml").into();

        Ok(AppConfig { graph, relational, embedding, llm, welding_processes_path, mode_detection_path })
    }
}

fn required_env(key: &str) -> CoreResult<String> {
    std::env::var(key).map_err(|_| CoreError::Config(format!("missing required environment variable: {key}")))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed_or<T: std::str::FromStr>(key: &str, default: T) -> CoreResult<T> {
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|_| CoreError::Config(format!("invalid value for {key}: {value}"))),
        Err(_) => Ok(default),
    }
}

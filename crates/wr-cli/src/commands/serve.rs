//! `serve` subcommand: wires every collaborator once and runs the HTTP
//! API until shutdown (§5 composition root, §6).

use anyhow::Context;
use clap::Args;

use wr_db::DbPool;
use wr_embedding::EmbeddingClient;
use wr_graph::GraphClient;
use wr_intent::{IntentProcessor, LlmClient};
use wr_orchestrator::Pipeline;
use wr_recommend::RecommendationEngine;
use wr_web::AppState;

use crate::config::AppConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(long, default_value = "8080")]
    pub port: u16,
}

pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("startup configuration error")?;

    let graph = GraphClient::connect(&config.graph).await.context("failed to connect to graph store")?;
    wr_graph::initialize_schema(&graph).await.context("failed to initialize graph schema")?;

    let db = DbPool::connect(&config.relational).await.context("failed to connect to relational store")?;

    let embedding = EmbeddingClient::new(&config.embedding);
    let llm = LlmClient::new(config.llm.clone());
    let vocabulary = wr_core::DomainVocabulary::load(&config.welding_processes_path, &config.mode_detection_path)
        .context("failed to load domain vocabulary")?;

    let intent = IntentProcessor::new(llm, vocabulary.clone());
    let recommend = RecommendationEngine::new(graph.clone(), embedding, vocabulary);
    let pipeline = Pipeline::new(intent.clone(), recommend.clone());

    let state = AppState::new(pipeline, intent, recommend, graph, db);

    tracing::info!(port = args.port, "starting server");
    wr_web::run_server(state, args.port).await.context("server exited with an error")?;
    Ok(())
}

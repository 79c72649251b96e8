//! `load` subcommand: one-shot batch ETL from the three source JSON
//! files into the graph store, in dependency order — products first,
//! since the compatibility and sales loaders validate GIN references
//! against what's already in the catalog.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;
use wr_graph::GraphClient;
use wr_loader::{CompatibilityLoader, LoadReport, ProductLoader, SalesLoader};

use crate::config::AppConfig;

#[derive(Args)]
pub struct LoadArgs {
    /// Path to enhanced_simplified_products.json
    #[arg(long)]
    pub products: PathBuf,

    /// Path to compatibility_rules.json
    #[arg(long)]
    pub compatibility: PathBuf,

    /// Path to sales_data.json
    #[arg(long)]
    pub sales: PathBuf,
}

pub async fn execute(args: LoadArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("startup configuration error")?;
    let graph = GraphClient::connect(&config.graph).await.context("failed to connect to graph store")?;
    wr_graph::initialize_schema(&graph).await.context("failed to initialize graph schema")?;

    let product_report = ProductLoader::new(&graph).load_file(&args.products).await.context("product load failed")?;
    print_report("products", &product_report);

    let known_gins = known_gins_from(&args.products)?;

    let compatibility_report =
        CompatibilityLoader::new(&graph).load_file(&args.compatibility).await.context("compatibility load failed")?;
    print_report("compatibility rules", &compatibility_report);

    let sales_report =
        SalesLoader::new(&graph).load_file(&args.sales, Some(&known_gins)).await.context("sales load failed")?;
    print_report("sales records", &sales_report);

    Ok(())
}

fn known_gins_from(products_path: &std::path::Path) -> anyhow::Result<std::collections::HashSet<String>> {
    let records = wr_loader::report::read_json_array(products_path)?;
    Ok(records
        .into_iter()
        .filter_map(|record| record.get("gin_number")?.as_str().map(|s| s.trim().to_string()))
        .collect())
}

fn print_report(stage: &str, report: &LoadReport) {
    info!(stage, total = report.total, valid = report.valid, invalid = report.invalid, "load stage complete");
    if !report.is_clean() {
        for error in &report.errors {
            tracing::warn!(stage, record_id = %error.record_id, message = %error.message, "rejected record");
        }
    }
}

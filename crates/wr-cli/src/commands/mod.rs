//! CLI command definitions and dispatch.

use clap::{Parser, Subcommand};

pub mod load;
pub mod serve;

#[derive(Parser)]
#[command(name = "wr-cli")]
#[command(author, version, about = "Welding equipment recommender: HTTP server and data loader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (chat, enterprise recommendations, health, metrics)
    Serve(serve::ServeArgs),

    /// Run the batch data loader against the product/compatibility/sales files
    Load(load::LoadArgs),
}

impl Cli {
    pub async fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Load(args) => load::execute(args).await,
        }
    }
}

//! Model Server CLI
//!
//! A command-line tool for checking the model server and requesting
//! predictions from it.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, predict};

/// Model Server CLI
#[derive(Parser)]
#[command(name = "msctl")]
#[command(author, version, about = "CLI for the Regression Model Server", long_about = None)]
pub struct Cli {
    /// Server URL (can also be set via MSCTL_API_URL env var)
    #[arg(long, env = "MSCTL_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the server is alive
    Health,

    /// Request a prediction
    Predict {
        /// Model to use
        #[arg(long, short, value_enum)]
        model: predict::ModelName,

        /// Feature values, in training column order
        #[arg(allow_negative_numbers = true)]
        features: Vec<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Health => {
            health::show_health(&client, cli.format).await?;
        }
        Commands::Predict { model, features } => {
            predict::run_prediction(&client, model, features, cli.format).await?;
        }
    }

    Ok(())
}

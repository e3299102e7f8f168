//! Promptlab CLI — entry point.
//!
//! # Commands
//!
//! - `promptlab serve` — run the chat proxy (`POST /api/chat`)
//! - `promptlab providers` — list routes and credential status
//! - `promptlab route MODEL` — show where a model key would be sent

mod helpers;
mod providers_cmd;
mod route_cmd;
mod serve;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Promptlab — multi-provider chat-completion proxy
#[derive(Parser)]
#[command(name = "promptlab", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.promptlab/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the proxy server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List configured providers and whether their credentials are set
    Providers,

    /// Show which provider a model key resolves to
    Route {
        /// Model key as a client would send it in `model`
        model: String,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials usually live in a local .env next to the UI project.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(logs);
            if let Ok(path) = &dotenv {
                tracing::debug!(path = %path.display(), "loaded .env");
            }
            serve::run(config_path, host, port).await
        }
        Commands::Providers => providers_cmd::run(config_path),
        Commands::Route { model } => route_cmd::run(config_path, &model),
    }
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins when set; otherwise `--logs` turns on debug output.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("promptlab=debug,tower_http=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

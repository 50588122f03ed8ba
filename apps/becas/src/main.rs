//! # Becas - Scholarship Content Server
//!
//! The main binary for the Becas content catalog.
//!
//! This application provides:
//! - HTTP JSON API (admin console + public viewer)
//! - CLI interface for catalog maintenance
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  apps/becas (THE BINARY)                │
//! │                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐  │
//! │  │   CLI       │    │   HTTP API  │    │   Config    │  │
//! │  │  (clap)     │    │   (axum)    │    │ (toml+env)  │  │
//! │  └──────┬──────┘    └──────┬──────┘    └──────┬──────┘  │
//! │         └──────────────────┼──────────────────┘         │
//! │                            ▼                            │
//! │                    ┌───────────────┐                    │
//! │                    │  becas-core   │                    │
//! │                    │ (THE LOGIC)   │                    │
//! │                    └───────────────┘                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! becas server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! becas init
//! becas seed-demo
//! becas status
//! becas export -o convocatorias.csv
//! ```

use becas::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // BECAS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("BECAS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "becas=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Becas startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗ ███████╗ ██████╗ █████╗ ███████╗
  ██╔══██╗██╔════╝██╔════╝██╔══██╗██╔════╝
  ██████╔╝█████╗  ██║     ███████║███████╗
  ██╔══██╗██╔══╝  ██║     ██╔══██║╚════██║
  ██████╔╝███████╗╚██████╗██║  ██║███████║
  ╚═════╝ ╚══════╝ ╚═════╝╚═╝  ╚═╝╚══════╝

  Scholarship Content Server v{}

  Editions • Stages • Sections • Requirements
"#,
        env!("CARGO_PKG_VERSION")
    );
}

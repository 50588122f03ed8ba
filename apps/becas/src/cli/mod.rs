//! # Becas CLI Module
//!
//! This module implements the CLI interface for Becas.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `init` - Initialize a new database
//! - `status` - Show record counts
//! - `export` - Write all editions to a CSV file
//! - `seed-demo` - Create a sample edition with preset sections

mod commands;

use crate::config::{AppConfig, Backend, ConfigError};
use becas_core::{CatalogError, DeletePolicy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Becas - Scholarship Content Server
///
/// Manages the editions, stages, sections and requirement items published
/// to scholarship applicants.
#[derive(Parser, Debug)]
#[command(name = "becas")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the redb database (overrides config and BECAS_DATABASE)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend: "redb" (persistent) or "memory" (volatile)
    #[arg(short = 'B', long, global = true)]
    pub backend: Option<Backend>,

    /// Delete policy for records with children: "reject" or "cascade"
    #[arg(long, global = true)]
    pub delete_policy: Option<DeletePolicy>,

    /// Path to a TOML config file (default: ./becas.toml if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show record counts
    Status,

    /// Export all editions as CSV
    Export {
        /// Output file or directory (default: dated file name in the working directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a sample edition, stage, preset sections and requirements
    SeedDemo,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve settings: defaults, config file, environment, then flags.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env()?;

    if let Some(database) = &cli.database {
        config.database = database.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(policy) = cli.delete_policy {
        config.delete_policy = policy;
    }
    if let Some(Commands::Server { host, port }) = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    if cli.verbose {
        tracing::info!(
            database = %config.database.display(),
            backend = %config.backend,
            delete_policy = %config.delete_policy,
            "Configuration resolved"
        );
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { .. }) => cmd_server(config).await,
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::Export { output }) => cmd_export(&config, output.as_deref()),
        Some(Commands::SeedDemo) => cmd_seed_demo(&config, json_mode),
        None => {
            // No subcommand - show status by default
            cmd_status(&config, json_mode)
        }
    }
}

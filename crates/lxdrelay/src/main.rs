//! lxdrelay - LXD image resolution backed by GitHub releases
//!
//! This is the main entry point for the lxdrelay server and CLI.

mod cli;
mod commands;
mod server;
mod tls;
mod version;

use anyhow::{Context, Result};
use clap::Parser;
use lxdrelay_core::{HierarchicalConfigLoader, LogFormat, LoggingConfig, RuntimeConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    if let Commands::Version(args) = cli.command {
        return commands::version::run(args);
    }

    let mut config = load_config(&cli)?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    init_tracing(&config.logging, cli.verbose, cli.quiet);

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, config).await,
        Commands::Resolve(args) => commands::resolve::run(args, config).await,
        Commands::Version(args) => commands::version::run(args),
    }
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let loader = HierarchicalConfigLoader::new();
    let config = match &cli.config {
        Some(path) => loader.load_runtime_config_from(path),
        None => loader.load_runtime_config(),
    };
    config.context("Failed to load configuration")
}

/// Initialize tracing; `RUST_LOG` takes precedence over flags and config
fn init_tracing(logging: &LoggingConfig, verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so `resolve` output stays pipeable
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

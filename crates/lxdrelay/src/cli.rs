//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use lxdrelay_core::LogFormat;

/// lxdrelay - Serve LXD images straight from GitHub releases
#[derive(Parser, Debug)]
#[command(name = "lxdrelay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to lxdrelay.yaml (replaces the file in the config directory)
    #[arg(short, long, global = true, env = "LXDRELAY_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    /// Log output format (text, json)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the image resolution server
    Serve(ServeArgs),

    /// Resolve a single image reference and print the result
    Resolve(ResolveArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address (e.g. ":8081" or "127.0.0.1:8443")
    #[arg(short, long)]
    pub listen: Option<String>,

    /// PEM certificate chain
    #[arg(long)]
    pub cert: Option<Utf8PathBuf>,

    /// PEM private key
    #[arg(long)]
    pub key: Option<Utf8PathBuf>,

    /// Serve plain HTTP
    #[arg(long)]
    pub no_tls: bool,

    /// Per-request resolution timeout in seconds (0 disables)
    #[arg(long)]
    pub request_timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Image reference: owner/repo/image[/vVERSION]
    pub reference: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

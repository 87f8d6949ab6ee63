//! Resolve command: one-shot resolution from the command line

use crate::cli::ResolveArgs;
use anyhow::{Context, Result};
use lxdrelay_core::RuntimeConfig;
use lxdrelay_resolver::{GitHubClient, ImageReference, ImageResolver};
use std::sync::Arc;

pub async fn run(args: ResolveArgs, config: RuntimeConfig) -> Result<()> {
    let reference = ImageReference::parse(&args.reference)?;

    let client = GitHubClient::new(&config.github, &config.network)
        .context("Failed to create GitHub client")?;
    let resolver = ImageResolver::new(Arc::new(client));

    let resolved = resolver
        .resolve_image(&reference)
        .await
        .with_context(|| format!("Failed to resolve {}", reference))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("URL:      {}", resolved.download_url);
        println!("Checksum: {}", resolved.checksum);
    }

    Ok(())
}

//! Serve command: run the HTTP(S) resolution server

use crate::cli::ServeArgs;
use crate::server::{self, AppState};
use crate::tls::{self, TlsListener};
use anyhow::{Context, Result};
use lxdrelay_core::{RuntimeConfig, ServerConfig};
use lxdrelay_resolver::{GitHubClient, ImageResolver};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub async fn run(args: ServeArgs, config: RuntimeConfig) -> Result<()> {
    let server_config = apply_args(config.server.clone(), args);

    let client = GitHubClient::new(&config.github, &config.network)
        .context("Failed to create GitHub client")?;
    if config.github.token.is_none() {
        info!("No GitHub token configured, using unauthenticated API rate limits");
    }

    let state = AppState::new(
        Arc::new(ImageResolver::new(Arc::new(client))),
        server_config.request_timeout(),
    );
    let app = server::create_router(state);
    let addr = server_config.listen_addr();

    if server_config.tls {
        let tls_config = tls::load_tls_config(&server_config.cert_file, &server_config.key_file)?;
        let listener = TlsListener::bind(&addr, tls_config)
            .await
            .with_context(|| format!("Failed to listen on {}", addr))?;
        info!(addr = %addr, cert = %server_config.cert_file, "Listening for HTTPS connections");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to listen on {}", addr))?;
        info!(addr = %addr, "Listening for HTTP connections");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    info!("Server stopped");
    Ok(())
}

/// Command-line flags win over every configuration layer
fn apply_args(mut server: ServerConfig, args: ServeArgs) -> ServerConfig {
    if let Some(listen) = args.listen {
        server.listen = listen;
    }
    if let Some(cert) = args.cert {
        server.cert_file = cert;
    }
    if let Some(key) = args.key {
        server.key_file = key;
    }
    if args.no_tls {
        server.tls = false;
    }
    if let Some(secs) = args.request_timeout {
        server.request_timeout_secs = secs;
    }
    server
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal, draining connections");
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use catbrowse_catalog::{BreedCatalog, HttpUpstream, Upstream};
use catbrowse_server::logger::{Verbosity, init_logger};
use catbrowse_server::{AppState, JwtVerifier, ServerConfig, router};
use clap::{ArgAction, Parser};
use tokio::net::TcpListener;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(about = "Serve the breed catalog over HTTP.")]
struct Cli {
    /// Configuration file, defaults to `catbrowse.toml` if present
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `listen_addr`
    #[arg(short, long, value_name = "ADDR")]
    listen: Option<SocketAddr>,

    /// Increase logging verbosity
    ///
    /// Invoke multiple times for increasing detail.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Silence logs except for errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(Verbosity::from_flags(cli.verbose, cli.quiet))
        .context("could not initialize logging")?;
    debug!(?cli, "parsed arguments");

    let mut config =
        ServerConfig::load(cli.config.as_deref()).context("could not load configuration")?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    debug!(?config, "loaded configuration");

    let upstream =
        HttpUpstream::new(config.upstream.clone()).context("could not create provider client")?;
    let catalog = BreedCatalog::new(
        Upstream::Http(upstream),
        config.upstream.enrichment_timeout(),
    );
    let verifier = Arc::new(JwtVerifier::new(&config.auth.token_secret));
    let app = router(AppState::new(catalog, verifier));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("could not listen on {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "service is up and running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error running service")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

//! wfa-server (Word Frequency Analysis) - upload documents, retrieve ranked
//! word frequencies by id
//!
//! Composition root: resolves configuration, initializes tracing, creates the
//! single process-wide analysis store and serves the HTTP API until Ctrl+C or
//! SIGTERM. Analyses live only as long as the process.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wfa_common::config::{ConfigFileResolver, ConfigOverrides, ServiceConfig, TomlConfig};
use wfa_server::{build_router, AnalysisStore, AppState, Ingestor, PageFailurePolicy};

/// Command-line arguments for wfa-server
#[derive(Parser, Debug)]
#[command(name = "wfa-server")]
#[command(about = "Word frequency analysis service")]
#[command(version)]
struct Args {
    /// TOML config file (`WFA_CONFIG` is consulted by the config resolver)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long, env = "WFA_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WFA_PORT")]
    port: Option<u16>,

    /// Maximum upload size in bytes
    #[arg(long, env = "WFA_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Fail PDF uploads when any page cannot be extracted, instead of skipping it
    #[arg(long, env = "WFA_STRICT_PDF_PAGES")]
    strict_pdf_pages: bool,

    /// Log filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(long, env = "WFA_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind_address.clone(),
            port: self.port,
            max_upload_bytes: self.max_upload_bytes,
            skip_failed_pdf_pages: self.strict_pdf_pages.then_some(false),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing exists; problems are logged once it does
    let config_path = ConfigFileResolver::new("wfa-server").resolve(args.config.as_deref());
    let config = ServiceConfig::resolve(
        args.overrides(),
        TomlConfig::load_or_default(config_path.as_deref()),
    );

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting WFA Word Frequency Analysis (wfa-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, using defaults"),
    }

    config.validate().context("Invalid configuration")?;

    let page_policy = PageFailurePolicy::from_skip_flag(config.skip_failed_pdf_pages);
    if page_policy == PageFailurePolicy::Skip {
        info!("Unreadable PDF pages will be skipped; such analyses may be incomplete");
    }

    // One store for the lifetime of the process
    let store = Arc::new(AnalysisStore::new());
    let ingestor = Ingestor::new(store).with_page_policy(page_policy);
    let app = build_router(AppState::new(ingestor, config.max_upload_bytes));

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("wfa-server listening on http://{}", addr);
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

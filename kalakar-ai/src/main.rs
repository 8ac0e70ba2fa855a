//! kalakar-ai - AI listing and voice assistant service
//!
//! **Module Identity:**
//! - Name: kalakar-ai
//! - Default port: 5730
//!
//! Configuration priority: CLI → `KALAKAR_*` environment → TOML → defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kalakar_common::auth::token_digest;
use kalakar_common::config::{load_config, LoggingConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kalakar_ai::clients::AiClients;
use kalakar_ai::config::AiSettings;
use kalakar_ai::{build_router, AppState, MODULE_NAME};

/// Command-line arguments for kalakar-ai
#[derive(Parser, Debug)]
#[command(name = "kalakar-ai")]
#[command(about = "AI listing generation and voice assistant for the Kalakar marketplace")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/kalakar/kalakar-ai.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and KALAKAR_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Interface to bind (overrides config and KALAKAR_BIND_ADDRESS)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref(), MODULE_NAME)
        .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    init_tracing(&config.logging)?;

    info!("Starting {} v{}", MODULE_NAME, env!("CARGO_PKG_VERSION"));

    let settings = AiSettings::resolve(&config).context("Failed to resolve AI settings")?;
    info!(
        model = %settings.gemini_model,
        timeout_secs = settings.request_timeout.as_secs(),
        generation_rps = settings.generation_rate.get(),
        "AI clients configured"
    );

    let clients = AiClients::from_settings(&settings).context("Failed to build AI clients")?;

    let auth_token = config.auth.api_token.as_deref().map(token_digest);
    if auth_token.is_none() {
        warn!("No API token configured, authentication is disabled");
    }

    let app = build_router(AppState::new(clients, auth_token));

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", logging.level)));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init()?;
        }
    }

    Ok(())
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }

    shutdown.cancel();
}

//! Docbridge gateway server.
//!
//! Main entry point for the docbridge HTTP gateway. Exposes the answer
//! endpoints (`/gemini`, `/exaone`) and the EXAONE health probe, wiring the
//! search collaborator and the LLM backends together.

mod error;
mod handlers;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use clap::Parser;
use docbridge_core::{config::AppConfig, logging, AppResult};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Docbridge gateway - document-grounded answers over interchangeable LLM backends
#[derive(Parser, Debug)]
#[command(name = "docbridge")]
#[command(about = "Document-grounded answer gateway", long_about = None)]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "DOCBRIDGE_PORT")]
    port: Option<u16>,

    /// Path to config file
    #[arg(short, long, env = "DOCBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // .env first, so AppConfig::load sees the variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let config = config.with_overrides(
        cli.config,
        cli.port,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    info!("Docbridge gateway starting");
    tracing::debug!("Search service: {}", config.search_base_url);
    tracing::debug!("EXAONE server: {}", config.exaone_base_url);
    tracing::debug!("Gemini model: {}", config.gemini_model);

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router.
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/gemini", get(handlers::ask::gemini))
        .route("/exaone", get(handlers::ask::exaone))
        .route("/exaone/health", get(handlers::health::exaone_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}

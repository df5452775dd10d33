//! djset-ai - DJ Set Curator service
//!
//! Turns a set brief (venue, date, style) into a generated DJ set, reconciles
//! it against a Spotify corpus playlist and optionally materializes it as a
//! new playlist.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use djset_ai::auth::{SpotifyOAuth, TokenProvider, DEFAULT_USER_ID};
use djset_ai::backends::build_backend;
use djset_ai::catalog::{Catalog, SpotifyCatalog};
use djset_ai::config::{CliOverrides, Settings};
use djset_ai::db::{init_database_pool, SqliteTokenStore};
use djset_ai::services::PlaylistOrchestrator;
use djset_ai::AppState;
use djset_common::config::{default_config_path, read_toml_config};

/// Command-line arguments for djset-ai
#[derive(Parser, Debug)]
#[command(name = "djset-ai")]
#[command(about = "DJ set generation and Spotify playlist reconciliation service")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/djset/djset-ai.toml)
    #[arg(short, long, env = "DJSET_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "DJSET_PORT")]
    port: Option<u16>,

    /// Generation backend (gemini, deepseek)
    #[arg(short, long, env = "DJSET_BACKEND")]
    backend: Option<String>,

    /// SQLite database for stored tokens
    #[arg(short, long, env = "DJSET_DATABASE")]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(short, long, env = "DJSET_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file first: it may carry the log level
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let toml_config = read_toml_config(&config_path)
        .with_context(|| format!("Failed to load config file {}", config_path.display()))?;

    let log_level = args
        .log_level
        .or_else(|| toml_config.as_ref().map(|c| c.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting djset-ai v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let toml_config = match toml_config {
        Some(config) => {
            info!("Config file: {}", config_path.display());
            config
        }
        None => {
            warn!(
                "Config file not found at {}; using defaults and environment",
                config_path.display()
            );
            Default::default()
        }
    };

    let cli = CliOverrides {
        port: args.port,
        backend: args.backend,
        database_path: args.database,
    };
    let settings = Settings::resolve(&toml_config, &cli).context("Invalid configuration")?;

    // Generation backend: missing credentials are fatal here, not per request
    let backend = build_backend(settings.backend, &settings.backend_settings)
        .context("Failed to initialize generation backend")?;

    info!("Database: {}", settings.database_path.display());
    let db_pool = init_database_pool(&settings.database_path).await?;
    info!("Database connection established");

    let token_store = Arc::new(SqliteTokenStore::new(db_pool));
    let oauth = Arc::new(
        SpotifyOAuth::new(&settings.spotify, token_store)
            .context("Failed to initialize Spotify OAuth")?,
    );
    info!("Spotify redirect URI: {}", settings.spotify.redirect_uri);

    let tokens: Arc<dyn TokenProvider> = oauth.clone();
    let catalog: Arc<dyn Catalog> = Arc::new(
        SpotifyCatalog::new(tokens, DEFAULT_USER_ID).context("Failed to initialize Spotify client")?,
    );

    let orchestrator = Arc::new(PlaylistOrchestrator::new(
        backend,
        catalog.clone(),
        settings.corpus_playlist,
    ));
    info!(
        provider = orchestrator.provider(),
        corpus_playlist = %orchestrator.default_corpus_name(),
        "Playlist orchestrator ready"
    );

    let state = AppState::new(orchestrator, catalog, oauth, DEFAULT_USER_ID);
    let app = djset_ai::build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

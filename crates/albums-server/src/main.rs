//! Album catalog server binary.
//!
//! Loads configuration, connects to the database, bootstraps the `albums`
//! table, and serves the HTTP API until SIGTERM/SIGINT.

use albums_server::{app, config, AppState};
use std::net::SocketAddr;
use std::process::ExitCode;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Fatal conditions that stop the process before or while serving.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Pool(#[from] albums_db::PoolError),
    #[error("failed to get database connection: {0}")]
    Connection(#[from] r2d2::Error),
    #[error("cannot connect to the database: {0}")]
    Ping(#[from] rusqlite::Error),
    #[error(transparent)]
    Schema(#[from] albums_db::SchemaError),
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("ALBUMS_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter =
        EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().unwrap_or("config.toml");

    let config = match config::load_config(Some(selected_config_path)) {
        Ok(config) => config,
        Err(e) => {
            // Tracing is configured from this file, so report directly.
            eprintln!("albums-server: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = selected_config_path,
        "resolved startup configuration path"
    );

    match run(config).await {
        Ok(()) => {
            tracing::info!("albums server shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "albums server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: config::Config) -> Result<(), StartupError> {
    let pool = albums_db::create_pool(&config.database.path, config.database.runtime_settings())?;

    {
        let conn = pool.get()?;
        albums_db::ping(&conn)?;
        tracing::info!(path = %config.database.path, "connected to the database");

        albums_db::bootstrap_schema(&conn)?;
        tracing::info!("albums table is ready");
    }

    let app = app(AppState { pool });
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting albums server");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}

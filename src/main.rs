//! Membership Tiers server
//!
//! Loads configuration, selects the storage backend and serves the tier API.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use membership_tiers::adapters::http::{api_router, TierAppState};
use membership_tiers::adapters::{
    InMemoryTierConfigurationRepository, PostgresTierConfigurationRepository,
};
use membership_tiers::config::{AppConfig, PostgresConfig, ServerConfig, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.server);
    info!(
        environment = ?config.server.environment,
        storage = ?config.storage.backend,
        "Starting Membership Tiers"
    );

    config.validate().context("Invalid configuration")?;

    let state = match config.storage.backend {
        StorageBackend::Postgres => {
            let repository = connect_postgres(&config.storage.postgres).await?;
            TierAppState::from_store(Arc::new(repository))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; tier configurations are lost on restart");
            TierAppState::from_store(Arc::new(InMemoryTierConfigurationRepository::new()))
        }
    };

    let app = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Membership Tiers shutdown complete");
    Ok(())
}

/// JSON output in production, human-readable output elsewhere.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    }
}

async fn connect_postgres(
    postgres: &PostgresConfig,
) -> Result<PostgresTierConfigurationRepository> {
    let pool = PgPoolOptions::new()
        .max_connections(postgres.max_connections)
        .acquire_timeout(postgres.acquire_timeout())
        .connect(&postgres.url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!(max_connections = postgres.max_connections, "Database pool ready");

    if postgres.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations applied");
    }

    Ok(PostgresTierConfigurationRepository::new(pool))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating shutdown");
        }
    }
}

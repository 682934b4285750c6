//! game-shelf server entry point.
//!
//! Connects to PostgreSQL, applies migrations, and starts the Axum HTTP
//! server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderValue, Method, StatusCode, header};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use game_shelf::api;
use game_shelf::app_state::AppState;
use game_shelf::config::{AllowedOrigins, ShelfConfig};
use game_shelf::persistence::{PostgresBoardGameStore, PostgresImageStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config = ShelfConfig::from_env().context("failed to load configuration")?;
    tracing::info!(addr = %config.listen_addr, "starting game-shelf");

    // Connect to the database
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "database pool ready"
    );

    if config.run_migrations {
        let migrator = Migrator::new(config.migrations_dir.clone())
            .await
            .with_context(|| {
                format!(
                    "failed to load migrations from {}",
                    config.migrations_dir.display()
                )
            })?;
        migrator
            .run(&pool)
            .await
            .context("failed to apply migrations")?;
        tracing::info!(dir = %config.migrations_dir.display(), "migrations applied");
    }

    // Build application state
    let app_state = AppState::new(
        Arc::new(PostgresBoardGameStore::new(pool.clone())),
        Arc::new(PostgresImageStore::new(pool.clone())),
    );

    // Build router
    let timeout = TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.request_timeout_secs),
    );
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins)?)
        .layer(timeout);
    let app = api::build_router().layer(middleware).with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("server stopped");

    Ok(())
}

/// Installs the global subscriber. `LOG_FORMAT=json` switches to JSON
/// lines; the filter comes from `RUST_LOG` and defaults to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// CORS policy for the configured origins. Credentials are only allowed
/// with an explicit origin list.
fn cors_layer(origins: &AllowedOrigins) -> anyhow::Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]);

    match origins {
        AllowedOrigins::Any => Ok(base.allow_origin(Any)),
        AllowedOrigins::List(list) => {
            let values = list
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .with_context(|| format!("invalid CORS origin {origin:?}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(base
                .allow_origin(AllowOrigin::list(values))
                .allow_credentials(true))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

//! Service configuration loaded from environment variables.
//!
//! All settings come from the environment (or a `.env` file via
//! `dotenvy`). Database credentials may be given either as a complete
//! `DATABASE_URL` or as the individual `DB_*` variables.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

/// Origins allowed by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*`: any origin, without credentials.
    Any,
    /// An explicit list of origins, credentials allowed.
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parses `*` or a comma-separated origin list. Blank entries are
    /// ignored; an empty list means any origin.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`ShelfConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ShelfConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Directory holding the SQL migrations.
    pub migrations_dir: PathBuf,

    /// Whether to apply pending migrations at startup.
    pub run_migrations: bool,

    /// CORS origins.
    pub allowed_origins: AllowedOrigins,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ShelfConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first to optionally load a `.env`
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if neither `DATABASE_URL` nor `DB_PASSWORD`
    /// is set, or if `LISTEN_ADDR` / `APP_PORT` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_err() {
            tracing::debug!("no .env file found, using process environment");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ShelfConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "LISTEN_ADDR",
                value: raw,
            })?,
            None => {
                let raw = lookup("APP_PORT").unwrap_or_else(|| "8080".to_string());
                let port: u16 = raw.parse().map_err(|_| ConfigError::Invalid {
                    key: "APP_PORT",
                    value: raw,
                })?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => build_database_url(&lookup)?,
        };

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1),
            database_connect_timeout_secs: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
            migrations_dir: lookup("MIGRATIONS_DIR")
                .map_or_else(|| PathBuf::from("./migrations"), PathBuf::from),
            run_migrations: parse_bool_or(&lookup, "RUN_MIGRATIONS", true),
            allowed_origins: AllowedOrigins::parse(
                &lookup("ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()),
            ),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30),
        })
    }
}

/// Assembles a PostgreSQL URL from the `DB_*` variables.
fn build_database_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let password = lookup("DB_PASSWORD")
        .filter(|p| !p.is_empty())
        .ok_or(ConfigError::Missing("DB_PASSWORD"))?;
    let user = lookup("DB_USER").unwrap_or_else(|| "mygameshelf".to_string());
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());
    let name = lookup("DB_NAME").unwrap_or_else(|| "my_game_shelf".to_string());
    Ok(format!(
        "postgres://{user}:{password}@{host}:{port}/{name}?sslmode=disable"
    ))
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses a variable as a boolean. Accepts `"true"`, `"1"`, `"false"`,
/// `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

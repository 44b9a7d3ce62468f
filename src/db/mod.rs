//! Database module.
//!
//! PostgreSQL is the production store; SQLite works for development and tests.
//! Both are reached through the sqlx `Any` driver so the queries are shared.

mod migrations;
mod repository;

pub use migrations::*;
pub use repository::*;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions};
use thiserror::Error;

use crate::config::Config;

/// Database errors raised while connecting or migrating.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),

    #[error("Failed to create database directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// SQL dialect of the configured database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatabaseBackend {
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DatabaseBackend::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(DatabaseBackend::Sqlite)
        } else {
            let scheme = url.split(':').next().unwrap_or_default();
            Err(DbError::UnsupportedUrl(scheme.to_string()))
        }
    }
}

/// Open a connection pool without touching the schema.
pub async fn connect(config: &Config) -> Result<AnyPool, DbError> {
    let backend = DatabaseBackend::from_url(&config.database_url)?;
    sqlx::any::install_default_drivers();

    let in_memory = backend == DatabaseBackend::Sqlite && is_sqlite_memory(&config.database_url);
    if backend == DatabaseBackend::Sqlite && !in_memory {
        ensure_sqlite_parent_dir(&config.database_url).await?;
    }

    let options = AnyConnectOptions::from_str(&config.database_url)?;
    let options = if config.sql_echo {
        options.log_statements(log::LevelFilter::Info)
    } else {
        options.disable_statement_logging()
    };

    // Each in-memory SQLite connection is its own database, so the pool must
    // hold exactly one connection for the lifetime of the process.
    let pool_options = if in_memory {
        AnyPoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        AnyPoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

/// Connect and bring the schema up to date.
pub async fn init_database(config: &Config) -> Result<AnyPool, DbError> {
    let backend = DatabaseBackend::from_url(&config.database_url)?;
    let pool = connect(config).await?;

    let applied = run_migrations(&pool, backend).await?;
    for migration in &applied {
        tracing::info!(
            version = migration.version,
            "Applied migration: {}",
            migration.description
        );
    }

    Ok(pool)
}

fn sqlite_path(url: &str) -> &str {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    path.split('?').next().unwrap_or_default()
}

fn is_sqlite_memory(url: &str) -> bool {
    let path = sqlite_path(url);
    path.is_empty() || path.starts_with(":memory:") || url.contains("mode=memory")
}

async fn ensure_sqlite_parent_dir(url: &str) -> Result<(), DbError> {
    let Some(parent) = Path::new(sqlite_path(url)).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| DbError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })
}

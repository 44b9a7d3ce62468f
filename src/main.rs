//! Qatoto Blogs Backend
//!
//! A REST backend for managing blog posts, persisted in PostgreSQL.

mod api;
mod config;
mod db;
mod errors;
mod healthcheck;
mod models;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::{DatabaseBackend, Repository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

#[derive(Parser)]
#[command(name = "qatoto-blogs")]
#[command(about = "Qatoto Blogs API server", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending schema migrations
    Migrate {
        /// List applied and pending migrations instead of applying them
        #[arg(long, conflicts_with = "offline")]
        status: bool,
        /// Print the SQL script without connecting to a database
        #[arg(long)]
        offline: bool,
        /// SQL dialect for --offline
        #[arg(long, value_enum, default_value_t = DatabaseBackend::Postgres)]
        backend: DatabaseBackend,
    },
    /// Probe a running server; exit 0 on a 2xx response, 1 otherwise
    Healthcheck {
        #[arg(long, default_value = healthcheck::DEFAULT_URL)]
        url: String,
        /// Timeout in seconds
        #[arg(long, default_value_t = healthcheck::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = load_config()?;
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Migrate {
            status,
            offline,
            backend,
        } => {
            if offline {
                print!("{}", db::offline_script(backend));
                return Ok(ExitCode::SUCCESS);
            }
            let config = load_config()?;
            migrate(&config, status).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Healthcheck { url, timeout } => {
            match healthcheck::probe(&url, Duration::from_secs(timeout)).await {
                Ok(()) => Ok(ExitCode::SUCCESS),
                Err(e) => {
                    eprintln!("healthcheck failed for {}: {}", url, e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config);
    Ok(config)
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Qatoto Blogs Backend");
    tracing::info!("Database: {}", config.redacted_database_url());
    tracing::info!("Bind address: {}", config.bind_addr);

    // Create tables before accepting traffic
    let pool = db::init_database(&config)
        .await
        .context("Failed to initialise database")?;
    let repo = Arc::new(Repository::new(pool));

    let app = create_router(AppState { repo: repo.clone() });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    repo.pool().close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn migrate(config: &Config, status: bool) -> anyhow::Result<()> {
    let backend = DatabaseBackend::from_url(&config.database_url)?;
    let pool = db::connect(config)
        .await
        .context("Failed to connect to database")?;

    if status {
        let applied = db::applied_versions(&pool).await?;
        for migration in db::MIGRATIONS {
            let state = if applied.contains(&migration.version) {
                "applied"
            } else {
                "pending"
            };
            println!("{:>4}  {:<8} {}", migration.version, state, migration.description);
        }
    } else {
        let applied = db::run_migrations(&pool, backend).await?;
        if applied.is_empty() {
            println!("Database is up to date");
        }
        for migration in applied {
            println!("Applied {}: {}", migration.version, migration.description);
        }
    }

    pool.close().await;
    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let blog_routes = Router::new()
        .route("/", get(api::list_blogs))
        .route("/blog/{blog_id}", get(api::get_blog))
        .route("/create-blog", post(api::create_blog))
        .route(
            "/update-blog/{blog_id}",
            put(api::update_blog).patch(api::partial_update_blog),
        )
        .route("/delete-blog/{blog_id}", delete(api::delete_blog));

    // Liveness and docs (no database access)
    let meta_routes = Router::new()
        .route("/health", get(health_check))
        .route("/openapi.json", get(api::openapi_json));

    Router::new()
        .merge(blog_routes)
        .merge(meta_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

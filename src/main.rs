pub mod db;
pub mod search;
pub mod server;
pub mod web;

use crate::search::{
    store::DatabaseSources, LocalSearchBackend, RecipeSearchService, RemoteSearchBackend,
    SearchBackend,
};
use crate::server::config::{SearchBackendKind, ServerConfig};

use clap::Parser;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // JSON to a daily-rotated file, human-readable to stdout
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

fn build_backend(
    config: &ServerConfig,
    sources: Arc<DatabaseSources>,
) -> Result<Arc<dyn SearchBackend>, Box<dyn std::error::Error + Send + Sync>> {
    match (config.search_backend, config.search_api_url.as_deref()) {
        (SearchBackendKind::Remote, Some(url)) => {
            info!(url, "Using remote search backend.");
            let backend =
                RemoteSearchBackend::new(url, &config.search_api_token, config.search_timeout())?;
            Ok(Arc::new(backend))
        }
        (SearchBackendKind::Remote, None) => {
            Err("SEARCH_API_URL is required when SEARCH_BACKEND is remote".into())
        }
        (SearchBackendKind::Local, _) => {
            info!("Using local search backend.");
            Ok(Arc::new(LocalSearchBackend::new(sources)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal.");
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Config is loaded before logging so the log directory can be configured.
    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&server_config.log_dir);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting recipe backend.");

    // --- Database Pool Setup ---
    let mut opt = ConnectOptions::new(server_config.database_url.to_owned());
    opt.max_connections(10);

    let db_pool: DatabaseConnection = match Database::connect(opt).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to create database connection.");
            return Err(e.into());
        }
    };
    info!("Database connection established.");

    // --- Search Setup ---
    let sources = Arc::new(DatabaseSources::new(db_pool.clone()));
    let backend = build_backend(&server_config, sources.clone())?;
    let search_service = Arc::new(RecipeSearchService::new(
        sources.clone(),
        sources,
        backend,
    ));

    // --- HTTP Server ---
    let app = crate::web::create_axum_router(db_pool, search_service, server_config.clone());

    let addr: SocketAddr = server_config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

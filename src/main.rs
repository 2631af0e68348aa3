//! Libros Server - library book inventory administration
//!
//! REST API server for the admin panel.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use libros_server::{
    api,
    config::{AppConfig, LoggingConfig, SessionStoreKind},
    db,
    repository::Repository,
    services::{
        redis::RedisSessionStore,
        sessions::{MemorySessionStore, SessionStore},
        Services,
    },
    AppState,
};

/// Console output, pretty or JSON, plus an optional daily-rolling file.
/// The returned guard flushes the file writer and must outlive the server.
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libros_server={},tower_http=debug", config.level).into());

    let json = config.format.eq_ignore_ascii_case("json");
    let pretty_layer = (!json).then(|| fmt::layer());
    let json_layer = json.then(|| fmt::layer().json());

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Failed to create log directory {}", directory))?;
            let appender = tracing_appender::rolling::daily(directory, "libros-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let _log_guard = init_tracing(&config.logging)?;

    tracing::info!("Starting Libros Server v{}", env!("CARGO_PKG_VERSION"));

    if config.is_production() {
        tracing::info!(secure = config.session.secure, "Production session cookies");
    }

    // Database
    let database = db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    database
        .migrate()
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    // Session store
    let sessions: Arc<dyn SessionStore> = match config.session.store {
        SessionStoreKind::Memory => {
            tracing::info!("Using in-memory session store");
            Arc::new(MemorySessionStore::new(config.session.ttl_hours))
        }
        SessionStoreKind::Redis => {
            let store = RedisSessionStore::new(&config.session.redis_url, config.session.ttl_hours)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Connected to Redis session store");
            Arc::new(store)
        }
    };

    if config.audit.transactional {
        tracing::info!("Audit entries are written in the same transaction as each mutation");
    }

    // Save server address before moving config
    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    // Create repository and services
    let repository = Repository::new(database.clone());
    let services = Services::new(repository, sessions, config.audit.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        db: database,
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use events_core::{
    config::{AppConfig, Config, LogFormat, StoreKind},
    connection::ConnectionManager,
    database::{self, PgConnector},
    store::{MemoryStore, PgStore, Store},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Без конфигурации не стартуем: это ошибка оператора, не повод для ретраев
    let config = Config::from_env()?;

    init_tracing(&config.app);
    info!("Starting Events API");

    match config.app.store {
        StoreKind::Postgres => {
            let connections = Arc::new(ConnectionManager::new(PgConnector::new(
                config.database.clone(),
            )));

            // Connect to the database
            let pool = connections.get().await?;
            database::run_migrations(&pool).await?;

            serve(config, PgStore::new(connections)).await
        }
        StoreKind::Memory => {
            info!("Using in-memory store, records are lost on exit");
            serve(config, MemoryStore::new()).await
        }
    }
}

fn init_tracing(app: &AppConfig) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&app.rust_log));

    match app.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn serve<S: Store>(config: Config, store: S) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port).parse()?;
    let app = events_core::app(AppState::new(config, store));

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

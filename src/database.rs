use futures::future::{BoxFuture, FutureExt};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::connection::{ConnectionManager, Connector};

pub type PgConnectionManager = ConnectionManager<PgConnector>;

/// Подключение к Postgres через пул sqlx.
///
/// Пул открывается сразу (`connect`, не `connect_lazy`): первое соединение
/// устанавливается до того, как хэндл считается готовым, поэтому запросы
/// не копятся в очереди к неготовому пулу. `acquire_timeout` ограничивает
/// ожидание соединения, и запрос к перегруженному пулу падает быстро.
#[derive(Debug, Clone)]
pub struct PgConnector {
    config: DatabaseConfig,
}

impl PgConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

impl Connector for PgConnector {
    type Handle = PgPool;

    fn connect(&self) -> BoxFuture<'static, Result<PgPool, String>> {
        let config = self.config.clone();
        async move {
            let connect = PgPoolOptions::new()
                .max_connections(config.pool_size)
                .acquire_timeout(config.acquire_timeout())
                .test_before_acquire(true)
                .connect(&config.url);

            match tokio::time::timeout(config.connect_timeout(), connect).await {
                Ok(Ok(pool)) => Ok(pool),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!(
                    "timed out after {}s",
                    config.connect_timeout_secs
                )),
            }
        }
        .boxed()
    }

    fn ping(&self, pool: &PgPool) -> BoxFuture<'static, Result<(), String>> {
        let pool = pool.clone();
        async move {
            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
        .boxed()
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");
    sqlx::migrate!("./src/migrations").run(pool).await?;
    info!("Migrations completed");
    Ok(())
}

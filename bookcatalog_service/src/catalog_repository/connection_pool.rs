use std::time::Duration;

use deadpool_postgres::{
    BuildError, Manager, ManagerConfig, Pool, PoolError, RecyclingMethod, Runtime,
};
use tokio_postgres::NoTls;

use crate::catalog_repository::CatalogRepositoryError;

pub struct PostgresPoolConfig {
    pub hostname: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Maximum number of connections handed out at the same time
    pub connection_limit: usize,
    pub timezone: String,
    pub acquire_timeout: Duration,
}

/// Builds the bounded catalog pool.
/// Connections are opened lazily, `get` waits at most `acquire_timeout` for a free one.
pub fn create_pool(config: &PostgresPoolConfig) -> Result<Pool, BuildError> {
    let mut pg_config = tokio_postgres::Config::new();
    pg_config
        .host(&config.hostname)
        .port(config.port)
        .dbname(&config.database)
        .user(&config.username)
        .password(&config.password)
        .options(&format!("-c TimeZone={}", config.timezone));

    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    Pool::builder(manager)
        .max_size(config.connection_limit)
        .wait_timeout(Some(config.acquire_timeout))
        .runtime(Runtime::Tokio1)
        .build()
}

/// Checks out one connection and checks that the database answers
pub async fn ping(pool: &Pool) -> Result<(), CatalogRepositoryError> {
    let client = pool.get().await?;
    client.simple_query("SELECT 1").await?;
    Ok(())
}

impl From<PoolError> for CatalogRepositoryError {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Timeout(_) => CatalogRepositoryError::PoolTimeout,
            PoolError::Backend(e) => CatalogRepositoryError::DatabaseFailure(e),
            PoolError::Closed => CatalogRepositoryError::PoolClosed,
            other => CatalogRepositoryError::Other(other.to_string()),
        }
    }
}

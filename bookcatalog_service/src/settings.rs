use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::catalog_repository::PostgresPoolConfig;
use crate::reviews::NYT_REVIEWS_URL;

/// Process configuration, read from environment variables such as `DB_HOST` or `API_KEY`
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_db_host")]
    pub db_host: String,
    #[serde(default = "Settings::default_db_port")]
    pub db_port: u16,
    #[serde(default = "Settings::default_db_name")]
    pub db_name: String,
    #[serde(default)]
    pub db_user: Option<String>,
    #[serde(default)]
    pub db_password: Option<String>,
    #[serde(default = "Settings::default_db_connection_limit")]
    pub db_connection_limit: usize,
    #[serde(default = "Settings::default_db_timezone")]
    pub db_timezone: String,
    #[serde(default = "Settings::default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    #[serde(default = "Settings::default_port")]
    pub port: u16,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "Settings::default_reviews_url")]
    pub reviews_url: String,
    #[serde(default = "Settings::default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub use_in_memory_db: bool,
    #[serde(default)]
    pub catalog_seed_path: Option<PathBuf>,
}

impl Settings {
    /// Reads the settings from the process environment
    pub fn load() -> anyhow::Result<Self> {
        Self::from_source(config::Environment::default().try_parsing(true))
    }

    fn from_source(
        source: impl config::Source + Send + Sync + 'static,
    ) -> anyhow::Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.db_connection_limit == 0 {
            bail!("DB_CONNECTION_LIMIT must be greater than 0");
        }
        if self.page_size == 0 {
            bail!("PAGE_SIZE must be greater than 0");
        }
        Ok(())
    }

    pub fn page_size(&self) -> anyhow::Result<NonZeroU32> {
        NonZeroU32::new(self.page_size).context("PAGE_SIZE must be greater than 0")
    }

    pub fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().context("API_KEY must be set")
    }

    pub fn pool_config(&self) -> anyhow::Result<PostgresPoolConfig> {
        Ok(PostgresPoolConfig {
            hostname: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            username: self.db_user.clone().context("DB_USER must be set")?,
            password: self.db_password.clone().context("DB_PASSWORD must be set")?,
            connection_limit: self.db_connection_limit,
            timezone: self.db_timezone.clone(),
            acquire_timeout: Duration::from_millis(self.db_acquire_timeout_ms),
        })
    }

    fn default_db_host() -> String {
        "localhost".to_string()
    }

    fn default_db_port() -> u16 {
        5432
    }

    fn default_db_name() -> String {
        "goodreads".to_string()
    }

    fn default_db_connection_limit() -> usize {
        4
    }

    fn default_db_timezone() -> String {
        "UTC".to_string()
    }

    fn default_db_acquire_timeout_ms() -> u64 {
        30_000
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_reviews_url() -> String {
        NYT_REVIEWS_URL.to_string()
    }

    fn default_page_size() -> u32 {
        10
    }
}

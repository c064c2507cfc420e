use serde::{Deserialize, Serialize};

pub use connection_pool::{create_pool, PostgresPoolConfig};
pub use in_memory_catalog_repository::InMemoryCatalogRepository;
pub use postgres_catalog_repository::PostgresCatalogRepository;

use crate::api::{BookId, BookTitleAndId};

mod connection_pool;
mod in_memory_catalog_repository;
mod postgres_catalog_repository;

#[derive(thiserror::Error, Debug)]
pub enum CatalogRepositoryError {
    #[error("Book {0} not found")]
    NotFound(BookId),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Timed out waiting for a database connection")]
    PoolTimeout,

    #[error("Connection pool is closed")]
    PoolClosed,

    #[error("Other error {0}")]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Row of the catalog table exactly as stored.
/// `authors` and `genres` hold `|` joined lists and are decoded by the catalog service.
pub struct BookRecord {
    pub book_id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<i64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Read-only access to the book catalog.
/// Every method is one independent statement, nothing here is transactional.
#[async_trait::async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Counts books whose title starts with `prefix`, an empty prefix matches every book
    async fn count_titles_with_prefix(&self, prefix: &str) -> Result<u64, CatalogRepositoryError>;

    /// Lists up to `limit` books whose title starts with `prefix`, ordered by title
    async fn list_titles_with_prefix(
        &self,
        prefix: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<BookTitleAndId>, CatalogRepositoryError>;

    /// Retrieves the full record of one book
    async fn get_book_record(&self, book_id: &str) -> Result<BookRecord, CatalogRepositoryError>;
}

use anyhow::Context;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

use crate::api::BookTitleAndId;
use crate::catalog_repository::connection_pool::ping;
use crate::catalog_repository::{
    create_pool, BookRecord, CatalogRepository, CatalogRepositoryError, PostgresPoolConfig,
};

/// Statements issued against the catalog table, parameters are always bound positionally
#[derive(Debug, Clone, Copy)]
enum CatalogStatement {
    CountTitlesWithPrefix,
    ListTitlesWithPrefix,
    GetBookById,
}

impl CatalogStatement {
    fn sql(self) -> &'static str {
        match self {
            CatalogStatement::CountTitlesWithPrefix => {
                "SELECT COUNT(*) FROM book2018 WHERE title LIKE $1"
            }
            CatalogStatement::ListTitlesWithPrefix => {
                "SELECT book_id, title FROM book2018 WHERE title LIKE $1 \
                 ORDER BY title ASC LIMIT $2 OFFSET $3"
            }
            CatalogStatement::GetBookById => {
                "SELECT book_id, title, authors, description, edition, format, pages, \
                 rating, rating_count, review_count, genres, image_url \
                 FROM book2018 WHERE book_id = $1"
            }
        }
    }
}

/// Turns a title prefix into a LIKE pattern, escaping the pattern metacharacters
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl TryFrom<&Row> for BookTitleAndId {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            book_id: row.try_get("book_id")?,
            title: row.try_get("title")?,
        })
    }
}

impl TryFrom<&Row> for BookRecord {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            book_id: row.try_get("book_id")?,
            title: row.try_get("title")?,
            authors: row.try_get("authors")?,
            description: row.try_get("description")?,
            edition: row.try_get("edition")?,
            format: row.try_get("format")?,
            pages: row.try_get("pages")?,
            rating: row.try_get("rating")?,
            rating_count: row.try_get("rating_count")?,
            review_count: row.try_get("review_count")?,
            genres: row.try_get("genres")?,
            image_url: row.try_get("image_url")?,
        })
    }
}

pub struct PostgresCatalogRepository {
    pool: Pool,
}

impl PostgresCatalogRepository {
    /// Creates the pool and pings the database, failing if it is unreachable
    pub async fn init(config: PostgresPoolConfig) -> anyhow::Result<Self> {
        tracing::info!(
            hostname = %config.hostname,
            port = config.port,
            database = %config.database,
            connection_limit = config.connection_limit,
            "Connecting to catalog database"
        );
        let pool = create_pool(&config).context("Cannot create connection pool")?;

        tracing::info!("Pinging database...");
        ping(&pool).await.context("Cannot ping database")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Runs one statement on its own pooled connection.
    /// The connection goes back to the pool on every exit path when `client` is dropped.
    async fn execute(
        &self,
        statement: CatalogStatement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, CatalogRepositoryError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(statement.sql()).await?;
        Ok(client.query(&stmt, params).await?)
    }
}

#[async_trait::async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn count_titles_with_prefix(&self, prefix: &str) -> Result<u64, CatalogRepositoryError> {
        let pattern = like_prefix_pattern(prefix);
        let rows = self
            .execute(CatalogStatement::CountTitlesWithPrefix, &[&pattern])
            .await?;

        let count: i64 = rows
            .first()
            .ok_or_else(|| CatalogRepositoryError::Other("Count not returned".to_string()))?
            .try_get(0)?;

        u64::try_from(count)
            .map_err(|_| CatalogRepositoryError::Other(format!("Negative count {count}")))
    }

    async fn list_titles_with_prefix(
        &self,
        prefix: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<BookTitleAndId>, CatalogRepositoryError> {
        let pattern = like_prefix_pattern(prefix);
        let limit = i64::from(limit);
        let offset = i64::try_from(offset)
            .map_err(|_| CatalogRepositoryError::Other(format!("Offset {offset} out of range")))?;

        let rows = self
            .execute(
                CatalogStatement::ListTitlesWithPrefix,
                &[&pattern, &limit, &offset],
            )
            .await?;

        rows.iter()
            .map(|row| Ok(BookTitleAndId::try_from(row)?))
            .collect()
    }

    async fn get_book_record(&self, book_id: &str) -> Result<BookRecord, CatalogRepositoryError> {
        let rows = self
            .execute(CatalogStatement::GetBookById, &[&book_id])
            .await?;

        let row = rows
            .first()
            .ok_or_else(|| CatalogRepositoryError::NotFound(book_id.to_string()))?;

        Ok(BookRecord::try_from(row)?)
    }
}

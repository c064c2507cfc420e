use std::path::Path;

use anyhow::Context;

use crate::api::BookTitleAndId;
use crate::catalog_repository::{BookRecord, CatalogRepository, CatalogRepositoryError};

/// Catalog kept in memory, rows stay in insertion order which breaks ties between equal titles
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    books: parking_lot::RwLock<Vec<BookRecord>>,
}

impl InMemoryCatalogRepository {
    pub fn with_books(books: impl IntoIterator<Item = BookRecord>) -> Self {
        Self {
            books: parking_lot::RwLock::new(books.into_iter().collect()),
        }
    }

    /// Loads a JSON array of book records
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog seed {}", path.display()))?;
        let books: Vec<BookRecord> =
            serde_json::from_str(&content).context("Failed to deserialize catalog seed")?;
        tracing::info!("Loaded {} books from {}", books.len(), path.display());
        Ok(Self::with_books(books))
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn count_titles_with_prefix(&self, prefix: &str) -> Result<u64, CatalogRepositoryError> {
        Ok(self
            .books
            .read()
            .iter()
            .filter(|book| book.title.starts_with(prefix))
            .count() as u64)
    }

    async fn list_titles_with_prefix(
        &self,
        prefix: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<BookTitleAndId>, CatalogRepositoryError> {
        let locked_books = self.books.read();
        let mut matching: Vec<&BookRecord> = locked_books
            .iter()
            .filter(|book| book.title.starts_with(prefix))
            .collect();
        // stable, equal titles keep insertion order
        matching.sort_by(|a, b| a.title.cmp(&b.title));

        Ok(matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .map(|book| BookTitleAndId {
                book_id: book.book_id.clone(),
                title: book.title.clone(),
            })
            .collect())
    }

    async fn get_book_record(&self, book_id: &str) -> Result<BookRecord, CatalogRepositoryError> {
        self.books
            .read()
            .iter()
            .find(|book| book.book_id == book_id)
            .cloned()
            .ok_or_else(|| CatalogRepositoryError::NotFound(book_id.to_string()))
    }
}

#[cfg(test)]
mod in_memory_catalog_repository_tests {
    use crate::api::BookTitleAndId;
    use crate::catalog_repository::{
        BookRecord, CatalogRepository, CatalogRepositoryError, InMemoryCatalogRepository,
    };

    fn record(book_id: &str, title: &str) -> BookRecord {
        BookRecord {
            book_id: book_id.to_string(),
            title: title.to_string(),
            authors: Some("Author".to_string()),
            description: None,
            edition: None,
            format: None,
            pages: None,
            rating: None,
            rating_count: None,
            review_count: None,
            genres: None,
            image_url: None,
        }
    }

    fn title_and_id(book_id: &str, title: &str) -> BookTitleAndId {
        BookTitleAndId {
            book_id: book_id.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_repository() {
        let repo = InMemoryCatalogRepository::default();
        assert_eq!(repo.count_titles_with_prefix("").await.unwrap(), 0);
        assert_eq!(repo.list_titles_with_prefix("", 10, 0).await.unwrap(), vec![]);
        assert!(matches!(
            repo.get_book_record("x").await,
            Err(CatalogRepositoryError::NotFound(..))
        ));
    }

    #[tokio::test]
    /// Tests prefix filtering, title ordering with insertion order ties and offset/limit slicing
    async fn test_list_titles_with_prefix() {
        let repo = InMemoryCatalogRepository::with_books([
            record("3", "Dune"),
            record("1", "Dracula"),
            record("4", "Emma"),
            record("2", "Dune"),
            record("5", "dune lowercase"),
        ]);

        assert_eq!(repo.count_titles_with_prefix("D").await.unwrap(), 3);
        assert_eq!(repo.count_titles_with_prefix("").await.unwrap(), 5);

        assert_eq!(
            repo.list_titles_with_prefix("D", 10, 0).await.unwrap(),
            vec![
                title_and_id("1", "Dracula"),
                title_and_id("3", "Dune"),
                title_and_id("2", "Dune"),
            ]
        );
        assert_eq!(
            repo.list_titles_with_prefix("D", 2, 2).await.unwrap(),
            vec![title_and_id("2", "Dune")]
        );
        assert_eq!(
            repo.list_titles_with_prefix("D", 2, 100).await.unwrap(),
            vec![]
        );
    }

    #[tokio::test]
    async fn test_get_book_record() {
        let stored = record("42", "Middlemarch");
        let repo = InMemoryCatalogRepository::with_books([stored.clone()]);
        assert_eq!(repo.get_book_record("42").await.unwrap(), stored);
    }
}

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::api::{Book, BookId, SearchPage};
use crate::catalog_repository::{BookRecord, CatalogRepository, CatalogRepositoryError};

/// Separator of the values packed into the `authors` and `genres` columns
pub const MULTI_VALUE_DELIMITER: char = '|';

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Book {0} not found")]
    NotFound(BookId),

    #[error("Book {book_id} has malformed {field}")]
    MalformedRecord {
        book_id: BookId,
        field: &'static str,
    },

    #[error(transparent)]
    Store(CatalogRepositoryError),
}

impl From<CatalogRepositoryError> for CatalogError {
    fn from(error: CatalogRepositoryError) -> Self {
        match error {
            CatalogRepositoryError::NotFound(book_id) => CatalogError::NotFound(book_id),
            other => CatalogError::Store(other),
        }
    }
}

/// Splits a `|` joined column into its values, a column without `|` is a single value
pub fn split_multi_value(value: &str) -> Vec<String> {
    value
        .split(MULTI_VALUE_DELIMITER)
        .map(str::to_string)
        .collect()
}

fn required_multi_value(
    book_id: &str,
    field: &'static str,
    value: Option<String>,
) -> Result<Vec<String>, CatalogError> {
    value
        .as_deref()
        .map(split_multi_value)
        .ok_or_else(|| CatalogError::MalformedRecord {
            book_id: book_id.to_string(),
            field,
        })
}

fn non_negative<T: TryFrom<i64>>(
    book_id: &str,
    field: &'static str,
    value: Option<i64>,
) -> Result<T, CatalogError> {
    T::try_from(value.unwrap_or_default()).map_err(|_| CatalogError::MalformedRecord {
        book_id: book_id.to_string(),
        field,
    })
}

impl TryFrom<BookRecord> for Book {
    type Error = CatalogError;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let book_id = record.book_id;
        Ok(Book {
            authors: required_multi_value(&book_id, "authors", record.authors)?,
            genres: required_multi_value(&book_id, "genres", record.genres)?,
            pages: non_negative(&book_id, "pages", record.pages.map(i64::from))?,
            rating_count: non_negative(&book_id, "rating_count", record.rating_count)?,
            review_count: non_negative(&book_id, "review_count", record.review_count)?,
            title: record.title,
            description: record.description.unwrap_or_default(),
            rating: record.rating.unwrap_or_default(),
            edition: record.edition,
            format: record.format,
            image_url: record.image_url,
            book_id,
        })
    }
}

/// Catalog search and book detail lookups on top of a [`CatalogRepository`]
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
    page_size: NonZeroU32,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CatalogRepository>, page_size: NonZeroU32) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    /// Number of titles returned by one search page
    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Returns one page of titles starting with `prefix`.
    ///
    /// The count and the page are two independent reads, a concurrent writer may make
    /// `total_count` disagree with `items`. Any store failure fails the whole search.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        prefix: &str,
        limit: NonZeroU32,
        offset: u64,
    ) -> Result<SearchPage, CatalogError> {
        let total_count = self.repository.count_titles_with_prefix(prefix).await?;
        let items = self
            .repository
            .list_titles_with_prefix(prefix, limit.get(), offset)
            .await?;

        tracing::debug!("Found {} of {} titles", items.len(), total_count);

        Ok(SearchPage {
            items,
            total_count,
            limit: limit.get(),
            offset,
        })
    }

    /// Resolves a single book, decomposing its multi-value columns
    #[tracing::instrument(skip(self))]
    pub async fn get_detail(&self, book_id: &str) -> Result<Book, CatalogError> {
        let record = self.repository.get_book_record(book_id).await?;
        Book::try_from(record).map_err(|err| {
            tracing::warn!("{}", err);
            err
        })
    }
}

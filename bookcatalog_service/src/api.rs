use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

use crate::pagination::PaginationState;

pub type BookId = String;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Struct containing book id and title
pub struct BookTitleAndId {
    pub book_id: BookId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
/// Full record of a single book with multi-value fields already decomposed
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
    pub description: String,
    pub pages: u32,
    pub rating: f64,
    pub rating_count: u64,
    pub review_count: u64,
    pub edition: Option<String>,
    pub format: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// JSON representation of `GET /search/{book_id}`
pub struct BookDetailsResponse {
    pub id: BookId,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub pages: u32,
    pub rating: f64,
    pub rating_count: u64,
    pub genres: Vec<String>,
}

impl From<Book> for BookDetailsResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.book_id,
            title: book.title,
            authors: book.authors,
            summary: book.description,
            pages: book.pages,
            rating: book.rating,
            rating_count: book.rating_count,
            genres: book.genres,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// One bounded slice of the titles matching a prefix, ordered by title
pub struct SearchPage {
    pub items: Vec<BookTitleAndId>,
    pub total_count: u64,
    pub limit: u32,
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// JSON representation of `GET /search`
pub struct SearchResponse {
    pub search: String,
    pub page: SearchPage,
    pub pagination: PaginationState,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// A critical review of a book as published by the external review service
pub struct ReviewEntry {
    pub title: String,
    pub author: String,
    pub reviewer: String,
    pub date: String,
    pub summary: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ReviewsResponse {
    pub book_title: String,
    pub author: String,
    pub reviews: Vec<ReviewEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct PrefixIndexResponse {
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ErrorResponse {
    pub error: String,
}

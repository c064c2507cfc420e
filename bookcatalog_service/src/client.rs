use anyhow::{bail, Context};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{
    BookDetailsResponse, ErrorResponse, PrefixIndexResponse, ReviewsResponse, SearchResponse,
};

pub struct BookCatalogClient {
    url: String,
    client: ClientWithMiddleware,
}

async fn error_message(response: reqwest::Response) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .map(|error| error.error)
        .unwrap_or_default()
}

impl BookCatalogClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls GET / endpoint
    pub async fn list_prefixes(&self) -> anyhow::Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/", self.url))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if response.status().is_success() {
            let index: PrefixIndexResponse = response.json().await?;
            Ok(index.prefixes)
        } else {
            bail!("Failed to list prefixes {}", error_message(response).await)
        }
    }

    /// Calls GET /search endpoint
    /// Returns None when no title starts with `search`
    pub async fn search(
        &self,
        search: &str,
        offset: u64,
    ) -> anyhow::Result<Option<SearchResponse>> {
        let offset = offset.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.url))
            .query(&[("search", search), ("offset", offset.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            bail!("Failed to search {}", error_message(response).await)
        }
    }

    /// Calls GET /search/{book_id} endpoint
    /// Returns None if the book is not in the catalog
    pub async fn get_book(&self, book_id: &str) -> anyhow::Result<Option<BookDetailsResponse>> {
        let response = self
            .client
            .get(format!("{}/search/{}", self.url, book_id))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            bail!("Failed to get book {}", error_message(response).await)
        }
    }

    /// Calls GET /reviews endpoint, authors are sent as one comma separated parameter
    pub async fn get_reviews(
        &self,
        book_title: &str,
        authors: &[String],
    ) -> anyhow::Result<ReviewsResponse> {
        let authors = authors.join(",");
        let response = self
            .client
            .get(format!("{}/reviews", self.url))
            .query(&[("bookTitle", book_title), ("author", authors.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            bail!("Failed to get reviews {}", error_message(response).await)
        }
    }
}

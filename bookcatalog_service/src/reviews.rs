use anyhow::Context;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

use crate::api::ReviewEntry;

pub const NYT_REVIEWS_URL: &str = "https://api.nytimes.com/svc/books/v3/reviews.json";

#[derive(thiserror::Error, Debug)]
pub enum ReviewsError {
    #[error("Review service request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    #[error("Review service responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Review service returned malformed payload: {0}")]
    Payload(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ReviewsPayload {
    results: Vec<ReviewItem>,
}

#[derive(Debug, Deserialize)]
struct ReviewItem {
    book_title: Option<String>,
    book_author: Option<String>,
    byline: Option<String>,
    publication_dt: Option<String>,
    summary: Option<String>,
    url: Option<String>,
}

impl From<ReviewItem> for ReviewEntry {
    fn from(item: ReviewItem) -> Self {
        Self {
            title: item.book_title.unwrap_or_default(),
            author: item.book_author.unwrap_or_default(),
            reviewer: item.byline.unwrap_or_default(),
            date: item.publication_dt.unwrap_or_default(),
            summary: item.summary.unwrap_or_default(),
            url: item.url.unwrap_or_default(),
        }
    }
}

/// Splits the comma separated `author` query parameter into author names
pub fn parse_author_list(authors: &str) -> Vec<String> {
    authors
        .split(',')
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapses several authors into the single search hint the review service understands
pub fn join_authors(authors: &[String]) -> String {
    authors.join(" and ")
}

/// Fetches critical reviews of a book from the external review service
pub struct ReviewAggregator {
    url: String,
    api_key: String,
    client: ClientWithMiddleware,
}

impl ReviewAggregator {
    pub fn new(url: &str, api_key: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Calls the review service once, an empty result list is a valid answer
    #[tracing::instrument(skip(self))]
    pub async fn get_reviews(
        &self,
        title: &str,
        authors: &[String],
    ) -> Result<Vec<ReviewEntry>, ReviewsError> {
        let author = join_authors(authors);
        let mut query = vec![("api-key", self.api_key.as_str()), ("title", title)];
        if !author.is_empty() {
            query.push(("author", author.as_str()));
        }

        let response = self.client.get(&self.url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewsError::Status { status, body });
        }

        let payload: ReviewsPayload = response.json().await?;
        tracing::debug!("Review service returned {} reviews", payload.results.len());

        Ok(payload.results.into_iter().map(ReviewEntry::from).collect())
    }
}

#[cfg(test)]
pub(crate) mod stub_review_api {
    use std::collections::HashMap;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{web, App, HttpResponse, HttpServer};

    /// Review service double answering every request with a fixed response
    #[derive(Clone)]
    pub struct StubReviewApi {
        pub status: StatusCode,
        pub body: String,
        pub requests: Arc<parking_lot::Mutex<Vec<HashMap<String, String>>>>,
    }

    impl StubReviewApi {
        pub fn new(status: StatusCode, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                requests: Default::default(),
            }
        }
    }

    async fn reviews(
        stub: web::Data<StubReviewApi>,
        query: web::Query<HashMap<String, String>>,
    ) -> HttpResponse {
        stub.requests.lock().push(query.into_inner());
        HttpResponse::build(stub.status)
            .content_type("application/json")
            .body(stub.body.clone())
    }

    /// Starts the stub on an ephemeral port and returns its reviews url
    pub fn start(stub: StubReviewApi) -> String {
        let data = web::Data::new(stub);
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/svc/books/v3/reviews.json", web::get().to(reviews))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind stub review api");
        let address = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}/svc/books/v3/reviews.json", address)
    }
}

#[cfg(test)]
mod review_aggregator_tests {
    use actix_web::http::StatusCode;
    use serde_json::json;

    use crate::api::ReviewEntry;
    use crate::reviews::stub_review_api::{self, StubReviewApi};
    use crate::reviews::{join_authors, parse_author_list, ReviewAggregator, ReviewsError};

    #[test]
    fn authors_are_parsed_and_joined() {
        let authors = parse_author_list("Terry Pratchett, Neil Gaiman,");
        assert_eq!(authors, vec!["Terry Pratchett", "Neil Gaiman"]);
        assert_eq!(join_authors(&authors), "Terry Pratchett and Neil Gaiman");
        assert_eq!(join_authors(&[]), "");
        assert!(parse_author_list("").is_empty());
    }

    #[actix_web::test]
    async fn reviews_are_mapped_in_source_order() {
        let body = json!({
            "status": "OK",
            "num_results": 2,
            "results": [
                {
                    "url": "http://www.nytimes.com/1990/good-omens.html",
                    "publication_dt": "1990-08-12",
                    "byline": "JANE DOE",
                    "book_title": "Good Omens",
                    "book_author": "Terry Pratchett and Neil Gaiman",
                    "summary": "A comedy about the end of the world.",
                    "isbn13": ["9780060853983"]
                },
                {
                    "url": "http://www.nytimes.com/2006/good-omens-again.html",
                    "publication_dt": "2006-01-01",
                    "byline": null,
                    "book_title": "Good Omens",
                    "book_author": "Neil Gaiman",
                    "summary": ""
                }
            ]
        });
        let stub = StubReviewApi::new(StatusCode::OK, &body.to_string());
        let requests = stub.requests.clone();
        let url = stub_review_api::start(stub);

        let aggregator = ReviewAggregator::new(&url, "secret").expect("Failed to create client");
        let reviews = aggregator
            .get_reviews(
                "Good Omens",
                &["Terry Pratchett".to_string(), "Neil Gaiman".to_string()],
            )
            .await
            .expect("Failed to get reviews");

        assert_eq!(
            reviews,
            vec![
                ReviewEntry {
                    title: "Good Omens".to_string(),
                    author: "Terry Pratchett and Neil Gaiman".to_string(),
                    reviewer: "JANE DOE".to_string(),
                    date: "1990-08-12".to_string(),
                    summary: "A comedy about the end of the world.".to_string(),
                    url: "http://www.nytimes.com/1990/good-omens.html".to_string(),
                },
                ReviewEntry {
                    title: "Good Omens".to_string(),
                    author: "Neil Gaiman".to_string(),
                    reviewer: "".to_string(),
                    date: "2006-01-01".to_string(),
                    summary: "".to_string(),
                    url: "http://www.nytimes.com/2006/good-omens-again.html".to_string(),
                },
            ]
        );

        let requests = requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["api-key"], "secret");
        assert_eq!(requests[0]["title"], "Good Omens");
        assert_eq!(requests[0]["author"], "Terry Pratchett and Neil Gaiman");
    }

    #[actix_web::test]
    async fn zero_results_is_an_empty_list() {
        let body = json!({"status": "OK", "num_results": 0, "results": []});
        let url = stub_review_api::start(StubReviewApi::new(StatusCode::OK, &body.to_string()));

        let aggregator = ReviewAggregator::new(&url, "secret").expect("Failed to create client");
        let reviews = aggregator
            .get_reviews("Unknown Book", &[])
            .await
            .expect("Failed to get reviews");
        assert!(reviews.is_empty());
    }

    #[actix_web::test]
    async fn error_status_is_an_upstream_error() {
        let url = stub_review_api::start(StubReviewApi::new(
            StatusCode::UNAUTHORIZED,
            r#"{"fault": "invalid api key"}"#,
        ));

        let aggregator = ReviewAggregator::new(&url, "wrong").expect("Failed to create client");
        let result = aggregator.get_reviews("Good Omens", &[]).await;
        assert!(matches!(
            result,
            Err(ReviewsError::Status { status, .. }) if status == reqwest::StatusCode::UNAUTHORIZED
        ));
    }

    #[actix_web::test]
    async fn malformed_payload_is_an_upstream_error() {
        let url = stub_review_api::start(StubReviewApi::new(StatusCode::OK, r#"{"status": "OK"}"#));

        let aggregator = ReviewAggregator::new(&url, "secret").expect("Failed to create client");
        let result = aggregator.get_reviews("Good Omens", &[]).await;
        assert!(matches!(result, Err(ReviewsError::Payload(..))));
    }

    #[actix_web::test]
    async fn unreachable_service_is_an_upstream_error() {
        let aggregator = ReviewAggregator::new("http://127.0.0.1:1/reviews.json", "secret")
            .expect("Failed to create client");
        let result = aggregator.get_reviews("Good Omens", &[]).await;
        assert!(matches!(result, Err(ReviewsError::Request(..))));
    }
}

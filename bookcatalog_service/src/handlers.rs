use std::sync::Arc;

use actix_web::http::header::ContentType;
use actix_web::web::Data;
use actix_web::{Error, HttpRequest, HttpResponse};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
    Apiv2Schema,
};
use serde::Deserialize;

use crate::api::{
    BookDetailsResponse, BookId, ErrorResponse, PrefixIndexResponse, ReviewsResponse,
    SearchResponse,
};
use crate::catalog::{CatalogError, CatalogService};
use crate::negotiation::{negotiate, NotAcceptable, Representation};
use crate::pagination::paginate;
use crate::reviews::{join_authors, parse_author_list, ReviewAggregator};
use crate::views;

/// Prefixes offered on the landing page
pub const SEARCH_PREFIXES: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Deserialize, Apiv2Schema)]
pub struct SearchQuery {
    search: Option<String>,
    offset: Option<u64>,
}

#[derive(Debug, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    book_title: String,
    /// Comma separated list of authors
    author: Option<String>,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

fn not_acceptable(err: NotAcceptable) -> HttpResponse {
    tracing::warn!("{}", err);
    HttpResponse::NotAcceptable().json(ErrorResponse {
        error: err.to_string(),
    })
}

fn not_found(representation: Representation, message: String) -> HttpResponse {
    match representation {
        Representation::Html => HttpResponse::NotFound()
            .content_type(ContentType::html())
            .body(views::render_not_found(&message)),
        Representation::Json => HttpResponse::NotFound().json(ErrorResponse { error: message }),
    }
}

fn internal_error(err: &dyn std::error::Error) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: err.to_string(),
    })
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn index(request: HttpRequest) -> Result<HttpResponse, Error> {
    let prefixes: Vec<String> = SEARCH_PREFIXES.chars().map(String::from).collect();
    Ok(match negotiate(&request) {
        Ok(Representation::Html) => html(views::render_index(&prefixes)),
        Ok(Representation::Json) => HttpResponse::Ok().json(PrefixIndexResponse { prefixes }),
        Err(err) => not_acceptable(err),
    })
}

#[api_v2_operation]
pub async fn search(
    catalog: Data<Arc<CatalogService>>,
    query: web::Query<SearchQuery>,
    request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let representation = match negotiate(&request) {
        Ok(representation) => representation,
        Err(err) => return Ok(not_acceptable(err)),
    };
    let SearchQuery { search, offset } = query.into_inner();
    let search = search.unwrap_or_default();
    let offset = offset.unwrap_or_default();
    let limit = catalog.page_size();

    Ok(match catalog.search(&search, limit, offset).await {
        Ok(page) if page.items.is_empty() => not_found(
            representation,
            format!("No books found for search term '{}'", search),
        ),
        Ok(page) => {
            let pagination = paginate(page.offset, limit, page.total_count);
            let response = SearchResponse {
                search,
                page,
                pagination,
            };
            match representation {
                Representation::Html => html(views::render_search(&response)),
                Representation::Json => HttpResponse::Ok().json(response),
            }
        }
        Err(err) => {
            tracing::error!("Search failed {}", err);
            internal_error(&err)
        }
    })
}

#[api_v2_operation]
pub async fn get_book(
    catalog: Data<Arc<CatalogService>>,
    book_id: web::Path<BookId>,
    request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let representation = match negotiate(&request) {
        Ok(representation) => representation,
        Err(err) => return Ok(not_acceptable(err)),
    };

    Ok(match catalog.get_detail(&book_id).await {
        Ok(book) => match representation {
            Representation::Html => html(views::render_book(&book)),
            Representation::Json => HttpResponse::Ok().json(BookDetailsResponse::from(book)),
        },
        Err(CatalogError::NotFound(book_id)) => {
            not_found(representation, format!("Book '{}' not found", book_id))
        }
        Err(err) => {
            tracing::error!("Get book failed {}", err);
            internal_error(&err)
        }
    })
}

#[api_v2_operation]
pub async fn get_reviews(
    review_aggregator: Data<Arc<ReviewAggregator>>,
    query: web::Query<ReviewsQuery>,
    request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let representation = match negotiate(&request) {
        Ok(representation) => representation,
        Err(err) => return Ok(not_acceptable(err)),
    };
    let ReviewsQuery { book_title, author } = query.into_inner();
    let authors = parse_author_list(author.as_deref().unwrap_or_default());

    Ok(
        match review_aggregator.get_reviews(&book_title, &authors).await {
            Ok(reviews) => {
                let response = ReviewsResponse {
                    book_title,
                    author: join_authors(&authors),
                    reviews,
                };
                match representation {
                    Representation::Html => html(views::render_reviews(&response)),
                    Representation::Json => HttpResponse::Ok().json(response),
                }
            }
            Err(err) => {
                tracing::error!("Get reviews failed {}", err);
                internal_error(&err)
            }
        },
    )
}

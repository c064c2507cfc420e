//! HTML pages rendered by the browsing endpoints

use crate::api::{Book, ReviewsResponse, SearchResponse};

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encodes a value for use inside a link's query string
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => {
                encoded.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    encoded
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Only web links from upstream data become clickable
fn is_web_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

pub fn render_index(prefixes: &[String]) -> String {
    let mut body = String::from("<h1>Book Catalog</h1>\n<ul class=\"prefixes\">\n");
    for prefix in prefixes {
        body.push_str(&format!(
            "<li><a href=\"/search?search={}&amp;offset=0\">{}</a></li>\n",
            encode_query_value(prefix),
            escape_html(prefix)
        ));
    }
    body.push_str("</ul>");
    layout("Book Catalog", &body)
}

pub fn render_search(response: &SearchResponse) -> String {
    let search = escape_html(&response.search);
    let encoded_search = encode_query_value(&response.search);
    let mut body = format!(
        "<h1>Titles starting with &quot;{}&quot;</h1>\n<p>{} books found</p>\n<ol start=\"{}\">\n",
        search,
        response.page.total_count,
        response.page.offset + 1
    );
    for item in &response.page.items {
        body.push_str(&format!(
            "<li><a href=\"/search/{}\">{}</a></li>\n",
            encode_query_value(&item.book_id),
            escape_html(&item.title)
        ));
    }
    body.push_str("</ol>\n");

    let pagination = &response.pagination;
    if !pagination.single_page {
        body.push_str("<nav>\n");
        if pagination.has_prev {
            body.push_str(&format!(
                "<a rel=\"prev\" href=\"/search?search={}&amp;offset={}\">Previous</a>\n",
                encoded_search, pagination.prev_offset
            ));
        }
        body.push_str(&format!(
            "<span>Page {} of {}</span>\n",
            pagination.current_page + 1,
            pagination.last_page + 1
        ));
        if pagination.has_next {
            body.push_str(&format!(
                "<a rel=\"next\" href=\"/search?search={}&amp;offset={}\">Next</a>\n",
                encoded_search, pagination.next_offset
            ));
        }
        body.push_str("</nav>\n");
    }
    body.push_str("<a href=\"/\">Back</a>");
    layout(&format!("Search: {}", response.search), &body)
}

pub fn render_not_found(message: &str) -> String {
    layout(
        "Not found",
        &format!(
            "<h1>Not found</h1>\n<p>{}</p>\n<a href=\"/\">Back</a>",
            escape_html(message)
        ),
    )
}

pub fn render_book(book: &Book) -> String {
    let image = match &book.image_url {
        Some(image_url) if is_web_url(image_url) => format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape_html(image_url),
            escape_html(&book.title)
        ),
        _ => String::new(),
    };
    let edition = book
        .edition
        .as_deref()
        .map(|edition| format!("<dt>Edition</dt><dd>{}</dd>\n", escape_html(edition)))
        .unwrap_or_default();
    let format = book
        .format
        .as_deref()
        .map(|format| format!("<dt>Format</dt><dd>{}</dd>\n", escape_html(format)))
        .unwrap_or_default();

    let body = format!(
        "<h1>{title}</h1>\n{image}<dl>\n\
         <dt>Authors</dt><dd>{authors}</dd>\n\
         <dt>Genres</dt><dd>{genres}</dd>\n\
         <dt>Pages</dt><dd>{pages}</dd>\n\
         <dt>Rating</dt><dd>{rating} ({rating_count} ratings, {review_count} reviews)</dd>\n\
         {edition}{format}</dl>\n\
         <p>{description}</p>\n\
         <a href=\"/reviews?bookTitle={title_query}&amp;author={authors_query}\">Reviews</a>\n\
         <a href=\"/\">Back</a>",
        title = escape_html(&book.title),
        authors = escape_html(&book.authors.join(", ")),
        genres = escape_html(&book.genres.join(", ")),
        pages = book.pages,
        rating = book.rating,
        rating_count = book.rating_count,
        review_count = book.review_count,
        description = escape_html(&book.description),
        title_query = encode_query_value(&book.title),
        authors_query = encode_query_value(&book.authors.join(",")),
    );
    layout(&book.title, &body)
}

pub fn render_reviews(response: &ReviewsResponse) -> String {
    let mut body = format!(
        "<h1>Reviews of {}</h1>\n",
        escape_html(&response.book_title)
    );
    if response.reviews.is_empty() {
        body.push_str("<p>No reviews found</p>\n");
    } else {
        body.push_str("<ul class=\"reviews\">\n");
        for review in &response.reviews {
            let link = if is_web_url(&review.url) {
                format!("<a href=\"{}\">Read review</a>", escape_html(&review.url))
            } else {
                String::new()
            };
            body.push_str(&format!(
                "<li><h2>{}</h2><p>{}</p><p>{} {}</p><p>{}</p>{}</li>\n",
                escape_html(&review.title),
                escape_html(&review.author),
                escape_html(&review.reviewer),
                escape_html(&review.date),
                escape_html(&review.summary),
                link
            ));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("<p>Reviews provided by The New York Times</p>\n<a href=\"/\">Back</a>");
    layout(&format!("Reviews: {}", response.book_title), &body)
}

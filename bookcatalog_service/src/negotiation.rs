use actix_web::http::header::{Accept, Header, Quality, ACCEPT};
use actix_web::mime::{self, Mime};
use actix_web::HttpRequest;

/// Response bodies the service can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Html,
    Json,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Not acceptable: {0}")]
pub struct NotAcceptable(pub String);

fn representation_for(media_type: &Mime) -> Option<Representation> {
    let (type_, subtype) = (media_type.type_(), media_type.subtype());
    if type_ == mime::STAR || (type_ == mime::TEXT && (subtype == mime::HTML || subtype == mime::STAR))
    {
        Some(Representation::Html)
    } else if type_ == mime::APPLICATION && (subtype == mime::JSON || subtype == mime::STAR) {
        Some(Representation::Json)
    } else {
        None
    }
}

/// Picks the representation the client ranks highest.
/// Without an `Accept` header the client gets HTML, media types with `q=0` are refused.
pub fn negotiate(request: &HttpRequest) -> Result<Representation, NotAcceptable> {
    let raw_accept = match request.headers().get(ACCEPT) {
        None => return Ok(Representation::Html),
        Some(value) => value.to_str().unwrap_or_default().trim().to_string(),
    };
    if raw_accept.is_empty() {
        return Ok(Representation::Html);
    }

    let accept = Accept::parse(request).map_err(|_| NotAcceptable(raw_accept.clone()))?;
    let mut acceptable: Vec<_> = accept
        .iter()
        .filter(|media_range| media_range.quality > Quality::ZERO)
        .collect();
    // Equal qualities keep the order the client listed them in
    acceptable.sort_by(|a, b| b.quality.cmp(&a.quality));
    acceptable
        .into_iter()
        .find_map(|media_range| representation_for(&media_range.item))
        .ok_or(NotAcceptable(raw_accept))
}

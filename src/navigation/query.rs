//! Splitting locations into pathname and query, and encoding queries back.

use url::form_urlencoded;

use crate::routing::Params;

/// Split a location into its pathname and decoded query.
///
/// A `#fragment` is dropped. Repeated query keys keep the last value.
pub fn split(location: &str) -> (&str, Params) {
    let location = location.split('#').next().unwrap_or_default();

    match location.split_once('?') {
        Some((pathname, query)) => (pathname, parse(query)),
        None => (location, Params::new()),
    }
}

/// Decode an `application/x-www-form-urlencoded` query string.
pub fn parse(query: &str) -> Params {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Append `query` to `path`; an empty query adds nothing.
pub fn append(path: String, query: &Params) -> String {
    if query.is_empty() {
        return path;
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish();
    format!("{}?{}", path, encoded)
}

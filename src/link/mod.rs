use serde_json::Value;
use tracing::debug;
use url::Url;

/// Normalized shape of a backend-supplied link value.
///
/// Backends are not consistent about returning arrays vs. delimited strings
/// for galleries; classification insulates everything downstream from that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkField {
    Absent,
    Single(String),
    Collection(Vec<String>),
}

impl LinkField {
    pub fn is_absent(&self) -> bool {
        matches!(self, LinkField::Absent)
    }

    /// The URL for shapes that carry exactly one.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            LinkField::Single(url) => Some(url),
            _ => None,
        }
    }
}

fn is_valid_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Classifies a raw backend payload field as absent, a single URL, or a
/// gallery collection.
///
/// Delimited strings are split on comma first, else on whitespace, keeping
/// only tokens that start with `http` and parse as absolute http/https URLs.
/// Known limitation: a single URL containing a literal comma or space in its
/// query string will misclassify as a collection.
pub fn classify(raw: &Value) -> LinkField {
    match raw {
        Value::Null | Value::Bool(false) => LinkField::Absent,
        Value::Array(items) => {
            let urls: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|s| s.trim())
                .filter(|s| is_valid_http_url(s))
                .map(|s| s.to_string())
                .collect();
            if urls.is_empty() {
                LinkField::Absent
            } else {
                LinkField::Collection(urls)
            }
        }
        Value::String(text) => classify_str(text),
        other => {
            debug!("Unrecognized link value shape: {}", other);
            LinkField::Absent
        }
    }
}

fn classify_str(text: &str) -> LinkField {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return LinkField::Absent;
    }

    if looks_delimited(trimmed) {
        let tokens: Vec<&str> = if trimmed.contains(',') {
            trimmed.split(',').collect()
        } else {
            trimmed.split_whitespace().collect()
        };
        let mut urls: Vec<String> = tokens
            .into_iter()
            .map(|t| t.trim())
            .filter(|t| t.starts_with("http"))
            .map(|t| t.to_string())
            .collect();

        if urls.len() > 1 {
            urls.retain(|u| is_valid_http_url(u));
        }
        return match urls.len() {
            0 => LinkField::Absent,
            1 => LinkField::Single(urls.remove(0)),
            _ => {
                debug!("Classified delimited string as gallery of {} URLs", urls.len());
                LinkField::Collection(urls)
            }
        };
    }

    if !trimmed.contains("http") {
        return LinkField::Absent;
    }

    LinkField::Single(trimmed.to_string())
}

/// Heuristic for a single string that carries more than one URL token.
fn looks_delimited(text: &str) -> bool {
    if !text.contains("http") {
        return false;
    }
    if text.contains(',') {
        return true;
    }
    // A space between two substrings each starting with `http`.
    text.split_whitespace()
        .filter(|token| token.starts_with("http"))
        .count()
        > 1
}

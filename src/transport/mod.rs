//! HTTP transport.
//!
//! The dispatcher talks to the network through the [`Transport`] trait so the wire
//! can be swapped out (tests count calls through an in-process implementation).
//! [`HttpTransport`] is the real, blocking implementation.

mod http;

pub use http::HttpTransport;

/// One POST request with a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        header_first(&self.headers, &[name])
    }
}

/// A received response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lowercase.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_first(&self.headers, &[name])
    }
}

/// First non-empty header value among `names`, compared case-insensitively.
fn header_first<'a>(headers: &'a [(String, String)], names: &[&str]) -> Option<&'a str> {
    for name in names {
        let found = headers
            .iter()
            .find(|(k, v)| k.eq_ignore_ascii_case(name) && !v.trim().is_empty());
        if let Some((_, v)) = found {
            return Some(v.trim());
        }
    }
    None
}

/// Sends a request and returns whatever the server answered.
///
/// Implementations must not interpret status codes; a non-2xx answer is still
/// `Ok`. `Err` means no response was received.
pub trait Transport: Send + Sync {
    fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

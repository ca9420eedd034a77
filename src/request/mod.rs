//! Request model
//!
//! The structured form of a request description, built by one of the
//! parsers, optionally rewritten by an expander and finally rendered as a
//! curl command line.

pub mod json;
pub mod loader;
pub mod text;

use std::fmt;

pub use json::parse_json_request;
pub use loader::{load_request, RequestFormat};
pub use text::parse_text_request;

/// Protocol version requested on the request line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpVersion {
    /// No version given; no flag is emitted
    #[default]
    Unspecified,
    Http10,
    Http11,
    Http2,
    Http3,
}

impl HttpVersion {
    /// Map a request-line version token. Unknown tokens yield `Unspecified`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "HTTP/1.0" => HttpVersion::Http10,
            "HTTP/1.1" => HttpVersion::Http11,
            "HTTP/2" => HttpVersion::Http2,
            "HTTP/3" => HttpVersion::Http3,
            _ => HttpVersion::Unspecified,
        }
    }

    /// The curl option selecting this version
    pub fn curl_option(&self) -> Option<&'static str> {
        match self {
            HttpVersion::Unspecified => None,
            HttpVersion::Http10 => Some("--http1.0"),
            HttpVersion::Http11 => Some("--http1.1"),
            HttpVersion::Http2 => Some("--http2"),
            HttpVersion::Http3 => Some("--http3"),
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpVersion::Unspecified => "unspecified",
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
            HttpVersion::Http2 => "HTTP/2",
            HttpVersion::Http3 => "HTTP/3",
        };
        f.write_str(s)
    }
}

/// A single header line. `name` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A parsed request description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method token, taken as written (no case normalization)
    pub method: String,
    /// Target URL, not validated
    pub url: String,
    pub version: HttpVersion,
    /// Headers in source order; duplicates allowed
    pub headers: Vec<HeaderField>,
    /// Request body; empty means no body
    pub body: String,
}

impl HttpRequest {
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

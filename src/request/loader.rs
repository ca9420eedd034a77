//! Input format selection
//!
//! The input is held in memory and handed to each parser strategy in turn;
//! the first one that accepts it wins. A format error moves on to the next
//! strategy, any other error stops the search.

use tracing::debug;

use super::{json, text, HttpRequest};
use crate::errors::{CurlTemplateError, Result};

/// A parser strategy for request descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Text,
}

impl RequestFormat {
    /// JSON first, then the request file format
    pub const AUTO: &'static [RequestFormat] = &[RequestFormat::Json, RequestFormat::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestFormat::Json => "json",
            RequestFormat::Text => "text",
        }
    }

    pub fn parse(&self, input: &[u8]) -> Result<HttpRequest> {
        match self {
            RequestFormat::Json => json::parse_json_bytes(input),
            RequestFormat::Text => text::parse_text_request(input),
        }
    }
}

/// Parse `input` with the first strategy in `formats` that accepts it
pub fn load_request(input: &[u8], formats: &[RequestFormat]) -> Result<HttpRequest> {
    let mut last_error = None;

    for format in formats {
        match format.parse(input) {
            Ok(request) => {
                debug!(format = format.as_str(), "Input accepted");
                return Ok(request);
            }
            Err(e) if e.is_format_error() => {
                debug!(format = format.as_str(), error = %e, "Input rejected, trying next format");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        CurlTemplateError::Argument("no input format selected".to_string())
    }))
}

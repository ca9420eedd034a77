//! JSON request description
//!
//! ```json
//! {"method":"POST","url":"https://example/","header":{"Content-Type":"application/json"},"body":{"key":"value"}}
//! ```
//!
//! A string body is used verbatim; any other JSON body is re-serialized
//! compactly with object keys sorted. Header order follows the document.

use std::io::Read;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{HeaderField, HttpRequest};
use crate::errors::Result;

#[derive(Debug, Deserialize)]
struct JsonRequest {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    header: Option<IndexMap<String, String>>,
    #[serde(default)]
    body: Value,
}

/// Parse a JSON request description from a reader
pub fn parse_json_request<R: Read>(mut reader: R) -> Result<HttpRequest> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_json_bytes(&bytes)
}

/// Parse a JSON request description held in memory
pub fn parse_json_bytes(bytes: &[u8]) -> Result<HttpRequest> {
    let doc: JsonRequest = serde_json::from_slice(bytes)?;

    let headers = doc
        .header
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| HeaderField::new(name, value))
        .collect();

    let body = match doc.body {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => serde_json::to_string(&other)?,
    };

    let request = HttpRequest {
        method: doc.method.unwrap_or_default(),
        url: doc.url.unwrap_or_default(),
        headers,
        body,
        ..HttpRequest::default()
    };

    debug!(
        method = %request.method,
        url = %request.url,
        headers = request.headers.len(),
        body_len = request.body.len(),
        "Parsed JSON request"
    );

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpVersion;

    fn parse(s: &str) -> Result<HttpRequest> {
        parse_json_request(s.as_bytes())
    }

    #[test]
    fn test_parse_full_document() {
        let req = parse(
            r#"{"method":"POST","url":"https://example/","header":{"Content-Type":"application/json"},"body":{"key":"value"}}"#,
        )
        .unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.url, "https://example/");
        assert_eq!(req.version, HttpVersion::Unspecified);
        assert_eq!(req.headers, vec![HeaderField::new("Content-Type", "application/json")]);
        assert_eq!(req.body, r#"{"key":"value"}"#);
    }

    #[test]
    fn test_body_variants() {
        assert_eq!(parse(r#"{"url":"u"}"#).unwrap().body, "");
        assert_eq!(parse(r#"{"url":"u","body":null}"#).unwrap().body, "");
        assert_eq!(parse(r#"{"body":"x"}"#).unwrap().body, "x");
        assert_eq!(parse(r#"{"body":"line\n"}"#).unwrap().body, "line\n");
        assert_eq!(parse(r#"{"body":{"a":1}}"#).unwrap().body, r#"{"a":1}"#);
        assert_eq!(parse(r#"{"body":[1, 2, true]}"#).unwrap().body, "[1,2,true]");
        assert_eq!(parse(r#"{"body":42}"#).unwrap().body, "42");
        assert_eq!(parse(r#"{"body":false}"#).unwrap().body, "false");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req = parse("{}").unwrap();
        assert_eq!(req, HttpRequest::default());
    }

    #[test]
    fn test_header_order_follows_document() {
        let req = parse(r#"{"header":{"Z-Last":"1","A-First":"2","M-Middle":"3"}}"#).unwrap();
        let names: Vec<_> = req.headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Z-Last", "A-First", "M-Middle"]);
    }

    #[test]
    fn test_object_body_keys_sorted() {
        let req = parse(r#"{"body":{"b":1,"a":2}}"#).unwrap();
        assert_eq!(req.body, r#"{"a":2,"b":1}"#);

        let req = parse(r#"{"body":[{"z":true,"m":{"y":2,"x":3}}]}"#).unwrap();
        assert_eq!(req.body, r#"[{"m":{"x":3,"y":2},"z":true}]"#);
    }

    #[test]
    fn test_wrong_shapes_are_format_errors() {
        assert!(parse("GET https://example.com/").unwrap_err().is_format_error());
        assert!(parse(r#"{"method":1}"#).unwrap_err().is_format_error());
        assert!(parse(r#"{"url":["x"]}"#).unwrap_err().is_format_error());
        assert!(parse(r#"{"header":{"X":1}}"#).unwrap_err().is_format_error());
        assert!(parse(r#"["not","an","object"]"#).unwrap_err().is_format_error());
    }
}

//! Request file parser
//!
//! Reads the line-oriented format that looks like a raw HTTP request:
//!
//! ```text
//! # comments may appear anywhere
//! POST https://api.example.com/users HTTP/1.1
//! Content-Type: application/json
//! X-Long: first part
//!   folded continuation
//!
//! {"name": "John"}
//! ```
//!
//! The request line comes first, then headers up to a blank line, then the
//! body. Every body line keeps a trailing `\n`.

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{HeaderField, HttpRequest, HttpVersion};
use crate::errors::{CurlTemplateError, Result};

static REQUEST_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z]+)\s+(.*?)\s*(HTTP/[0-9](?:\.[0-9])?)?$")
        .expect("Invalid request line regex")
});

static HEADER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([!#$%&*+\-.^_`|~0-9A-Za-z]+):\s*(.*)$").expect("Invalid header line regex")
});

static COMMENT_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#").expect("Invalid comment regex"));

/// Parse a request file from a buffered reader
pub fn parse_text_request<R: BufRead>(reader: R) -> Result<HttpRequest> {
    let mut lines = LineReader::new(reader);

    let mut request = loop {
        let line = lines.read_line()?.ok_or_else(|| {
            CurlTemplateError::Format("no request line found before end of input".to_string())
        })?;

        if is_comment(&line) {
            continue;
        }

        match parse_request_line(&line) {
            Some(request) => break request,
            None => debug!(line = %line, "Skipping line before request line"),
        }
    };

    while let Some(line) = lines.read_continued_line()? {
        if line.is_empty() {
            break;
        }
        if is_comment(&line) {
            continue;
        }

        match parse_header_line(&line) {
            Some(header) => request.headers.push(header),
            None => debug!(line = %line, "Ignoring malformed header line"),
        }
    }

    let mut body = String::new();
    while let Some(line) = lines.read_line()? {
        if is_comment(&line) {
            continue;
        }
        body.push_str(&line);
        body.push('\n');
    }
    request.body = body;

    debug!(
        method = %request.method,
        url = %request.url,
        version = %request.version,
        headers = request.headers.len(),
        body_len = request.body.len(),
        "Parsed request file"
    );

    Ok(request)
}

/// Parse request file content held in memory
pub fn parse_text_content(content: &str) -> Result<HttpRequest> {
    parse_text_request(content.as_bytes())
}

fn is_comment(line: &str) -> bool {
    COMMENT_LINE_RE.is_match(line)
}

/// Parse `METHOD URL [HTTP/x[.y]]`. A version token other than the four
/// known ones leaves the version unspecified.
fn parse_request_line(line: &str) -> Option<HttpRequest> {
    let caps = REQUEST_LINE_RE.captures(line)?;

    let method = caps.get(1)?.as_str().to_string();
    let url = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default().to_string();
    let version = caps
        .get(3)
        .map(|m| HttpVersion::from_token(m.as_str()))
        .unwrap_or_default();

    Some(HttpRequest {
        method,
        url,
        version,
        ..HttpRequest::default()
    })
}

/// Parse `Name: value`
fn parse_header_line(line: &str) -> Option<HeaderField> {
    let caps = HEADER_LINE_RE.captures(line)?;
    let name = caps.get(1)?.as_str();
    let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    Some(HeaderField::new(name, value))
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Line reader with header folding: a line starting with a space or tab
/// continues the previous one.
struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Next line without its terminator, or `None` at end of input
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.inner.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Next logical line with continuations joined by a single space
    fn read_continued_line(&mut self) -> std::io::Result<Option<String>> {
        let Some(first) = self.read_line()? else {
            return Ok(None);
        };

        let mut line = first.trim_matches(is_space).to_string();
        if line.is_empty() {
            return Ok(Some(line));
        }

        while self.next_is_continuation()? {
            match self.read_line()? {
                Some(cont) => {
                    line.push(' ');
                    line.push_str(cont.trim_matches(is_space));
                }
                None => break,
            }
        }

        Ok(Some(line))
    }

    fn next_is_continuation(&mut self) -> std::io::Result<bool> {
        let buf = self.inner.fill_buf()?;
        Ok(matches!(buf.first(), Some(b' ') | Some(b'\t')))
    }
}

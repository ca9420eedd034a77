//! Curl command generation
//!
//! Renders a parsed request as a single shell-safe curl command line:
//!
//! ```text
//! curl [FLAGS...] 'URL' [-X 'METHOD'] [--httpX] [-H 'Name: value'...] [-d 'BODY']
//! ```
//!
//! Every request value goes through [`shell_quote`]; caller supplied flags are
//! passed through untouched.

mod highlight;

pub use highlight::format_curl_pretty;

use crate::request::HttpRequest;

/// The client the command line invokes
pub const CURL: &str = "curl";

/// Separator placed before each segment when pretty printing
const LINE_CONTINUATION: &str = "\\\n";

/// Generate the curl command for `request`
pub fn generate_curl_command(request: &HttpRequest, pretty: bool, flags: &[String]) -> String {
    let mut parts: Vec<String> = vec![CURL.to_string()];

    parts.extend(flags.iter().cloned());
    parts.push(shell_quote(&request.url));

    let continuation = |parts: &mut Vec<String>| {
        if pretty {
            parts.push(LINE_CONTINUATION.to_string());
        }
    };

    // GET without a body is curl's default
    if request.method != "GET" || request.has_body() {
        continuation(&mut parts);
        parts.push("-X".to_string());
        parts.push(shell_quote(&request.method));
    }

    if let Some(option) = request.version.curl_option() {
        continuation(&mut parts);
        parts.push(option.to_string());
    }

    for header in &request.headers {
        continuation(&mut parts);
        parts.push("-H".to_string());
        parts.push(shell_quote(&format!("{}: {}", header.name, header.value)));
    }

    if request.has_body() {
        continuation(&mut parts);
        parts.push("-d".to_string());
        parts.push(shell_quote(&request.body));
    }

    parts.join(" ")
}

/// Quote a string for POSIX shells: wrap in single quotes and turn each
/// embedded `'` into `'\''`.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

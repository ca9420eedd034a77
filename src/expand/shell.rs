//! Shell command expansion
//!
//! Each request field is fed to a shell as the body of an unquoted heredoc,
//! so `$(...)`, backticks and `$VAR` inside it are evaluated by the shell:
//!
//! ```text
//! cat <<EOS_1f3a...
//! <field text>
//! EOS_1f3a...
//! ```
//!
//! The captured stdout, minus one trailing newline, replaces the field.
//! The pass is all-or-nothing: the request is only updated once every field
//! has expanded.

use std::process::Stdio;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::errors::ExpansionError;
use crate::request::{HeaderField, HttpRequest};

/// Heredoc terminators start with this, followed by random hex
pub const DELIMITER_PREFIX: &str = "EOS_";

/// Shell used when none is configured
pub const DEFAULT_SHELL: &str = "bash";

/// Upper bound for a single field's subprocess
pub const DEFAULT_FIELD_TIMEOUT: Duration = Duration::from_millis(1000);

/// Upper bound for a whole expansion pass
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Expands request fields through a shell interpreter
#[derive(Debug)]
pub struct ShellExpander {
    program: String,
    field_timeout: Duration,
    rng: StdRng,
}

impl ShellExpander {
    /// Create an expander with a generator seeded from the OS
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_rng(program, StdRng::from_os_rng())
    }

    /// Create an expander with an explicit generator
    pub fn with_rng(program: impl Into<String>, rng: StdRng) -> Self {
        Self {
            program: program.into(),
            field_timeout: DEFAULT_FIELD_TIMEOUT,
            rng,
        }
    }

    pub fn field_timeout(mut self, timeout: Duration) -> Self {
        self.field_timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Expand every string field of `request`, bounded by `deadline`.
    ///
    /// On error the request is left untouched.
    pub async fn expand(&mut self, request: &mut HttpRequest, deadline: Duration) -> Result<(), ExpansionError> {
        let started = Instant::now();

        let expanded = tokio::time::timeout(deadline, self.expand_fields(request))
            .await
            .map_err(|_| ExpansionError::Timeout(deadline))??;

        *request = expanded;

        debug!(
            program = %self.program,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Shell expansion finished"
        );
        Ok(())
    }

    async fn expand_fields(&mut self, request: &HttpRequest) -> Result<HttpRequest, ExpansionError> {
        let method = self.expand_field("method", &request.method).await?;
        let url = self.expand_field("url", &request.url).await?;

        let mut headers = Vec::with_capacity(request.headers.len());
        for header in &request.headers {
            let name = self.expand_field("header name", &header.name).await?;
            let value = self.expand_field("header value", &header.value).await?;
            headers.push(HeaderField { name, value });
        }

        let body = self.expand_field("body", &request.body).await?;

        Ok(HttpRequest {
            method,
            url,
            version: request.version,
            headers,
            body,
        })
    }

    /// Run one field through the shell
    pub async fn expand_field(&mut self, field: &str, text: &str) -> Result<String, ExpansionError> {
        let delimiter = self.delimiter_for(text);
        let script = heredoc_script(&delimiter, text);

        tokio::time::timeout(self.field_timeout, run_script(&self.program, script))
            .await
            .map_err(|_| ExpansionError::FieldTimeout {
                field: field.to_string(),
                after: self.field_timeout,
            })?
    }

    /// A heredoc terminator that does not occur anywhere in `text`
    pub fn delimiter_for(&mut self, text: &str) -> String {
        loop {
            let candidate = format!("{}{:x}", DELIMITER_PREFIX, self.rng.random::<u64>());
            if !text.contains(&candidate) {
                return candidate;
            }
            debug!(candidate = %candidate, "Delimiter collides with field text, regenerating");
        }
    }
}

fn heredoc_script(delimiter: &str, text: &str) -> String {
    format!("cat <<{delimiter}\n{text}\n{delimiter}\n")
}

/// Run `script` through `<program> /dev/stdin`, writing the script while
/// stdout is being collected.
async fn run_script(program: &str, script: String) -> Result<String, ExpansionError> {
    let mut child = Command::new(program)
        .arg("/dev/stdin")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExpansionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
        ExpansionError::Pipe(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "shell stdin was not captured",
        ))
    })?;

    let writer = tokio::spawn(async move { stdin.write_all(script.as_bytes()).await });

    let output = child.wait_with_output().await.map_err(ExpansionError::Pipe)?;

    if !output.status.success() {
        writer.abort();
        return Err(ExpansionError::Exit {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    writer
        .await
        .map_err(|e| ExpansionError::Pipe(std::io::Error::other(e)))?
        .map_err(ExpansionError::Pipe)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.strip_suffix('\n').unwrap_or(&stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpVersion;

    fn expander(seed: u64) -> ShellExpander {
        ShellExpander::with_rng(DEFAULT_SHELL, StdRng::seed_from_u64(seed))
    }

    fn first_candidate(seed: u64) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        format!("{}{:x}", DELIMITER_PREFIX, rng.random::<u64>())
    }

    #[test]
    fn test_heredoc_script() {
        assert_eq!(heredoc_script("EOS_1", "a\nb"), "cat <<EOS_1\na\nb\nEOS_1\n");
    }

    #[test]
    fn test_delimiter_format() {
        let delimiter = expander(1).delimiter_for("");
        assert!(delimiter.starts_with(DELIMITER_PREFIX));
        assert!(delimiter[DELIMITER_PREFIX.len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_delimiter_regenerated_on_collision() {
        let colliding = first_candidate(42);
        let text = format!("before\n{}\nafter", colliding);

        let delimiter = expander(42).delimiter_for(&text);
        assert_ne!(delimiter, colliding);
        assert!(!text.contains(&delimiter));
    }

    #[tokio::test]
    async fn test_expand_field_command_substitution() {
        let mut shell = expander(7);
        let out = shell.expand_field("url", "https://$(echo example.com)/").await.unwrap();
        assert_eq!(out, "https://example.com/");
    }

    #[tokio::test]
    async fn test_expand_field_with_colliding_text() {
        let colliding = first_candidate(42);
        let text = format!("before\n{}\nafter", colliding);

        let out = expander(42).expand_field("body", &text).await.unwrap();
        assert_eq!(out, text);
    }

    #[tokio::test]
    async fn test_expand_request_all_fields() {
        let mut req = HttpRequest {
            method: "$(echo POST)".into(),
            url: "https://`echo example.com`/".into(),
            version: HttpVersion::Http2,
            headers: vec![HeaderField::new("X-$(echo Id)", "$((40 + 2))")],
            body: "{\"n\":$(printf 1)}\n".into(),
        };

        expander(3).expand(&mut req, DEFAULT_TIMEOUT).await.unwrap();

        assert_eq!(req.method, "POST");
        assert_eq!(req.url, "https://example.com/");
        assert_eq!(req.version, HttpVersion::Http2);
        assert_eq!(req.headers, vec![HeaderField::new("X-Id", "42")]);
        assert_eq!(req.body, "{\"n\":1}\n");
    }

    #[tokio::test]
    async fn test_empty_fields_stay_empty() {
        let mut req = HttpRequest::default();
        expander(9).expand(&mut req, DEFAULT_TIMEOUT).await.unwrap();
        assert_eq!(req, HttpRequest::default());
    }

    #[tokio::test]
    async fn test_large_body_does_not_deadlock() {
        let body = "0123456789abcdef\n".repeat(32 * 1024);
        let mut shell = expander(11).field_timeout(Duration::from_secs(20));
        let out = shell.expand_field("body", &body).await.unwrap();
        assert_eq!(out, body);
    }

    #[tokio::test]
    async fn test_field_timeout() {
        let mut shell = expander(5).field_timeout(Duration::from_millis(200));
        let err = shell.expand_field("url", "$(sleep 5)").await.unwrap_err();
        assert!(matches!(err, ExpansionError::FieldTimeout { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_overall_timeout() {
        let mut req = HttpRequest {
            url: "$(sleep 5)".into(),
            ..HttpRequest::default()
        };
        let mut shell = expander(5).field_timeout(Duration::from_secs(10));
        let err = shell.expand(&mut req, Duration::from_millis(200)).await.unwrap_err();
        assert!(matches!(err, ExpansionError::Timeout(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_failure_leaves_request_untouched() {
        let mut req = HttpRequest {
            method: "$(echo PUT)".into(),
            url: "https://example.com/".into(),
            body: "$(sleep 5)".into(),
            ..HttpRequest::default()
        };
        let original = req.clone();

        let mut shell = expander(5).field_timeout(Duration::from_millis(200));
        assert!(shell.expand(&mut req, DEFAULT_TIMEOUT).await.is_err());
        assert_eq!(req, original);
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let mut shell = ShellExpander::with_rng("false", StdRng::seed_from_u64(1));
        let err = shell.expand_field("method", "GET").await.unwrap_err();
        assert!(matches!(err, ExpansionError::Exit { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let mut shell = ShellExpander::with_rng("/nonexistent/shell", StdRng::seed_from_u64(1));
        let err = shell.expand_field("method", "GET").await.unwrap_err();
        assert!(matches!(err, ExpansionError::Spawn { .. }), "got {:?}", err);
    }
}

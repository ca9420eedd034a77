//! Environment variable expansion
//!
//! Rewrites `$NAME` and `${NAME}` references in every request field using a
//! snapshot of the environment. Unknown names expand to the empty string.
//! Variables can also come from a `.env` style file, layered under the
//! process environment.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::CurlTemplateError;
use crate::request::HttpRequest;

/// `${NAME}`, a single special character (`$1`, `$?`, ...) or an alphanumeric run.
/// An unterminated `${` is bad syntax and matches on its own, so it is dropped.
static ENV_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\{([^}]*)\}|([*#$@!?0-9-])|([A-Za-z0-9_]+)|\{)").expect("Invalid env ref regex")
});

/// Environment variable store
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Create a new empty EnvVars
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Snapshot the process environment
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self { vars }
    }

    /// Load from a .env file
    pub fn load_file(path: &Path) -> Result<Self, CurlTemplateError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CurlTemplateError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Parse .env file content
    pub fn parse(content: &str) -> Result<Self, CurlTemplateError> {
        let mut vars = HashMap::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            if let Some((key, value)) = parse_env_line(line) {
                vars.insert(key, value);
            } else {
                return Err(CurlTemplateError::Config(format!(
                    "Invalid env file syntax at line {}: {}",
                    line_num + 1,
                    line
                )));
            }
        }

        Ok(Self { vars })
    }

    /// Overlay the process environment (process values win)
    pub fn merge_with_system(&mut self) {
        for (key, value) in std::env::vars() {
            self.vars.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|s| s.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Expand `$NAME` / `${NAME}` references in a string
    pub fn expand(&self, input: &str) -> String {
        ENV_REF_RE
            .replace_all(input, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                self.get(name).unwrap_or_default().to_string()
            })
            .into_owned()
    }

    /// Expand every string field of a request in place
    pub fn expand_request(&self, request: &mut HttpRequest) {
        request.method = self.expand(&request.method);
        request.url = self.expand(&request.url);
        for header in &mut request.headers {
            header.name = self.expand(&header.name);
            header.value = self.expand(&header.value);
        }
        request.body = self.expand(&request.body);
    }
}

/// Expand a request against the current process environment
pub fn expand_env(request: &mut HttpRequest) {
    EnvVars::from_env().expand_request(request);
}

/// Parse a single .env line into key-value pair
fn parse_env_line(line: &str) -> Option<(String, String)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();

    if key.is_empty() {
        return None;
    }

    let value_part = line[eq_pos + 1..].trim();

    let value = if value_part.len() >= 2 && value_part.starts_with('"') && value_part.ends_with('"') {
        unescape_double_quoted(&value_part[1..value_part.len() - 1])
    } else if value_part.len() >= 2 && value_part.starts_with('\'') && value_part.ends_with('\'') {
        value_part[1..value_part.len() - 1].to_string()
    } else {
        // Unquoted: stop at an inline comment
        match value_part.find(" #") {
            Some(pos) => value_part[..pos].trim().to_string(),
            None => value_part.to_string(),
        }
    };

    Some((key.to_string(), value))
}

fn unescape_double_quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('$') => result.push('$'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

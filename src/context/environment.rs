//! Environment struct (terminal detection, program name)

/// Execution environment
#[derive(Debug, Clone)]
pub struct Environment {
    pub stdin_isatty: bool,
    pub stdout_isatty: bool,
    /// Whether ANSI colors may be written to stdout
    pub colors: bool,
    pub program_name: String,
}

impl Environment {
    pub fn init() -> Self {
        Self::default()
    }
}

impl Default for Environment {
    fn default() -> Self {
        let stdout_isatty = atty::is(atty::Stream::Stdout);
        Self {
            stdin_isatty: atty::is(atty::Stream::Stdin),
            stdout_isatty,
            colors: stdout_isatty && detect_color_support(),
            program_name: "curl-template".to_string(),
        }
    }
}

/// Honors `NO_COLOR` and `TERM=dumb`
fn detect_color_support() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
}

//! CLI argument definitions using clap
//!
//! This module defines all command-line arguments for curl-template.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::request::RequestFormat;

/// Generate curl commands from HTTP request files
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "curl-template",
    version,
    about = "Generate curl commands from HTTP request files",
    after_help = "The request is read from FILE, or from standard input when FILE is omitted or \"-\".\n\
                  JSON descriptions ({\"method\", \"url\", \"header\", \"body\"}) are tried first,\n\
                  then the request file format (METHOD URL [HTTP/x], headers, blank line, body)."
)]
pub struct Args {
    /// Request file to read (JSON or request file format)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Extra curl flags, inserted verbatim before the URL (repeatable)
    #[arg(short = 'f', long = "flags", value_name = "FLAGS", action = ArgAction::Append, allow_hyphen_values = true)]
    pub flags: Vec<String>,

    /// Print the command over multiple lines
    #[arg(short = 'p', long = "prettyprint", action = ArgAction::SetTrue)]
    pub prettyprint: bool,

    /// When to highlight the command
    #[arg(long = "color", value_enum, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Input format; auto tries JSON, then the request file format
    #[arg(long = "format", value_enum, value_name = "FORMAT", default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    // =========================================================================
    // EXPANSION
    // =========================================================================

    /// Evaluate every field as a shell heredoc ($(...), `...`, $VAR)
    #[arg(short = 's', long = "expand-shell-command", action = ArgAction::SetTrue, conflicts_with = "expand_env")]
    pub expand_shell_command: bool,

    /// Substitute $NAME and ${NAME} from the environment
    #[arg(short = 'e', long = "expand-env", action = ArgAction::SetTrue)]
    pub expand_env: bool,

    /// Load variables for --expand-env from a .env file (process environment wins)
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Shell used by --expand-shell-command
    #[arg(long = "shell", value_name = "PROGRAM")]
    pub shell: Option<String>,

    /// Time limit in seconds for the whole shell expansion
    #[arg(long = "shell-timeout", value_name = "SECONDS")]
    pub shell_timeout: Option<f64>,

    /// Time limit in seconds for each expanded field
    #[arg(long = "field-timeout", value_name = "SECONDS")]
    pub field_timeout: Option<f64>,

    // =========================================================================
    // TROUBLESHOOTING
    // =========================================================================

    /// Log format for diagnostics on stderr
    #[arg(long = "log-format", value_enum, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Print debug logs and full error details
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,

    /// Print full error details
    #[arg(long = "traceback", action = ArgAction::SetTrue)]
    pub traceback: bool,
}

/// Input format selection
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    #[default]
    Auto,
    Json,
    Text,
}

impl InputFormat {
    /// Parser strategies to try, in order
    pub fn strategies(&self) -> &'static [RequestFormat] {
        match self {
            InputFormat::Auto => RequestFormat::AUTO,
            InputFormat::Json => &[RequestFormat::Json],
            InputFormat::Text => &[RequestFormat::Text],
        }
    }
}

/// Highlighting mode
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Highlight when writing to a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Log output format
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}

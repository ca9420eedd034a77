//! Main execution logic
//!
//! Reads the request description, picks a parser, applies the requested
//! expansion and prints the curl command.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, ColorChoice, LogFormat};
use crate::config::Config;
use crate::context::Environment;
use crate::curl::{format_curl_pretty, generate_curl_command};
use crate::errors::{CurlTemplateError, Result};
use crate::expand::{EnvVars, ShellExpander};
use crate::request::{load_request, HttpRequest};
use crate::status::ExitStatus;

/// Environment variable holding a log filter (EnvFilter syntax)
pub const LOG_ENV: &str = "CURL_TEMPLATE_LOG";

/// Main entry point for the CLI.
///
/// Loads configuration, parses arguments and runs [`program`] on a tokio
/// runtime, racing it against Ctrl+C.
pub fn run(args: Vec<String>, mut env: Environment) -> ExitStatus {
    if let Some(name) = args.first() {
        if let Some(basename) = Path::new(name).file_stem() {
            env.program_name = basename.to_string_lossy().to_string();
        }
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}", e);
            Config::default()
        }
    };

    let merged_args = merge_default_options(args, &config);

    let parsed = match Args::try_parse_from(&merged_args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    init_logging(&parsed);
    debug!(config_dir = %config.config_dir.display(), "Configuration loaded");

    let traceback = parsed.traceback || parsed.debug;

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(CurlTemplateError::Io(e), traceback),
    };

    // Ctrl+C is polled first so the handler is installed before any input is read
    let outcome = runtime.block_on(async {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => None,
            result = program(parsed, &config, &env) => Some(result),
        }
    });

    // A stdin read may still be parked on a blocking thread
    runtime.shutdown_background();

    match outcome {
        Some(Ok(status)) => status,
        Some(Err(e)) => handle_error(e, traceback),
        None => {
            eprintln!("\nInterrupted");
            ExitStatus::Interrupted
        }
    }
}

/// Read, parse, expand and print one request
pub async fn program(args: Args, config: &Config, env: &Environment) -> Result<ExitStatus> {
    let input = read_input(args.file.as_deref(), env).await?;
    let mut request = load_request(&input, args.format.strategies())?;

    expand_request(&args, config, &mut request).await?;

    let flags: Vec<String> = config
        .curl_flags
        .iter()
        .chain(args.flags.iter())
        .cloned()
        .collect();

    let mut command = generate_curl_command(&request, args.prettyprint, &flags);

    let colorize = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => env.colors,
    };
    if colorize {
        command = format_curl_pretty(&command);
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", command)?;
    stdout.flush()?;

    Ok(ExitStatus::Success)
}

/// Read the whole input once so every parser strategy sees the same bytes
async fn read_input(file: Option<&Path>, env: &Environment) -> Result<Vec<u8>> {
    match file {
        Some(path) if path != Path::new("-") => {
            debug!(path = %path.display(), "Reading request file");
            Ok(tokio::fs::read(path).await?)
        }
        _ => {
            if env.stdin_isatty {
                debug!("Reading request from terminal, end input with Ctrl+D");
            }
            let mut input = Vec::new();
            tokio::io::stdin().read_to_end(&mut input).await?;
            Ok(input)
        }
    }
}

async fn expand_request(args: &Args, config: &Config, request: &mut HttpRequest) -> Result<()> {
    if args.expand_shell_command {
        let program = args.shell.clone().unwrap_or_else(|| config.shell.program.clone());
        let field_timeout = timeout_arg(args.field_timeout, "--field-timeout")?
            .unwrap_or(config.shell.field_timeout);
        let deadline = timeout_arg(args.shell_timeout, "--shell-timeout")?
            .unwrap_or(config.shell.timeout);

        debug!(program = %program, ?field_timeout, ?deadline, "Expanding shell commands");
        let mut expander = ShellExpander::new(program).field_timeout(field_timeout);
        expander.expand(request, deadline).await?;
    } else if args.expand_env {
        let vars = match &args.env_file {
            Some(path) => {
                let mut vars = EnvVars::load_file(path)?;
                vars.merge_with_system();
                vars
            }
            None => EnvVars::from_env(),
        };
        debug!(variables = vars.len(), "Expanding environment variables");
        vars.expand_request(request);
    } else if args.env_file.is_some() {
        warn!("--env-file has no effect without --expand-env");
    }

    Ok(())
}

fn timeout_arg(secs: Option<f64>, flag: &str) -> Result<Option<Duration>> {
    secs.map(|s| {
        Duration::try_from_secs_f64(s).map_err(|_| {
            CurlTemplateError::Argument(format!("{} must be a non-negative number of seconds", flag))
        })
    })
    .transpose()
}

/// Install the stderr tracing subscriber
fn init_logging(args: &Args) {
    let default_level = if args.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match args.log_format.unwrap_or_default() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}

/// Insert flags from `[defaults] options` right after the program name
fn merge_default_options(args: Vec<String>, config: &Config) -> Vec<String> {
    if config.default_options.is_empty() {
        return args;
    }

    let (flags, positional): (Vec<_>, Vec<_>) = config
        .default_options
        .iter()
        .partition(|opt| opt.starts_with('-'));

    if !positional.is_empty() {
        eprintln!(
            "Warning: Positional arguments in default options are ignored: {:?}",
            positional
        );
    }

    if flags.is_empty() {
        return args;
    }

    let mut merged = Vec::with_capacity(args.len() + flags.len());

    if let Some(program) = args.first() {
        merged.push(program.clone());
    }

    merged.extend(flags.into_iter().cloned());
    merged.extend(args.into_iter().skip(1));

    merged
}

fn handle_error(error: CurlTemplateError, traceback: bool) -> ExitStatus {
    if traceback {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    ExitStatus::Error
}

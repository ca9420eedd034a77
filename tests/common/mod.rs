//! Common test utilities for curl-template integration tests
//!
//! - CLI invocation helpers with an isolated config directory
//! - Test fixture management

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Exit status codes matching the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
    Interrupted = 130,
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            130 => ExitStatus::Interrupted,
            _ => ExitStatus::Error,
        }
    }
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: ExitStatus,
    pub exit_code: i32,
}

impl CliOutput {
    /// The generated command without the final newline
    pub fn command(&self) -> &str {
        self.stdout.strip_suffix('\n').unwrap_or(&self.stdout)
    }
}

/// Mock environment for testing
pub struct MockEnvironment {
    /// Temporary config directory
    pub config_dir: TempDir,
    /// Environment variables to set
    pub env_vars: HashMap<String, String>,
    /// Standard input content
    pub stdin: Option<Vec<u8>>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp config dir");
        Self {
            config_dir,
            env_vars: HashMap::new(),
            stdin: None,
        }
    }

    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_stdin(&mut self, content: impl Into<Vec<u8>>) -> &mut Self {
        self.stdin = Some(content.into());
        self
    }

    /// Write `config.toml` into the config directory
    pub fn write_config(&mut self, content: &str) -> &mut Self {
        std::fs::write(self.config_path().join("config.toml"), content)
            .expect("Failed to write config");
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().to_path_buf()
    }
}

/// Run the CLI with the given arguments (excluding the program name)
pub fn curl_template(args: &[&str]) -> CliOutput {
    curl_template_with_env(args, &MockEnvironment::new())
}

/// Run the CLI with the given arguments feeding `stdin`
pub fn curl_template_stdin(args: &[&str], stdin: &str) -> CliOutput {
    let mut env = MockEnvironment::new();
    env.set_stdin(stdin);
    curl_template_with_env(args, &env)
}

/// Run the CLI with the given arguments and environment
pub fn curl_template_with_env(args: &[&str], env: &MockEnvironment) -> CliOutput {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_curl-template"));
    cmd.args(args);

    cmd.env("CURL_TEMPLATE_CONFIG_DIR", env.config_path());
    cmd.env_remove("CURL_TEMPLATE_LOG");
    for (key, value) in &env.env_vars {
        cmd.env(key, value);
    }

    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    match env.stdin {
        Some(ref stdin_data) => {
            cmd.stdin(Stdio::piped());
            let mut child = cmd.spawn().expect("Failed to spawn command");
            {
                let mut stdin = child.stdin.take().expect("Failed to open stdin");
                // The child may exit (e.g. on an argument error) before reading stdin.
                if let Err(e) = stdin.write_all(stdin_data) {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        panic!("Failed to write to stdin: {e:?}");
                    }
                }
            }
            parse_output(child.wait_with_output().expect("Failed to wait for command"))
        }
        None => {
            cmd.stdin(Stdio::null());
            parse_output(cmd.output().expect("Failed to execute command"))
        }
    }
}

fn parse_output(output: Output) -> CliOutput {
    let exit_code = output.status.code().unwrap_or(1);
    CliOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_status: ExitStatus::from(exit_code),
        exit_code,
    }
}

/// Create a temporary file with the given content
pub fn create_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = dir.path().join(name);
    std::fs::write(&file_path, content).expect("Failed to write temp file");
    (dir, file_path)
}

/// Test fixture paths
pub mod fixtures {
    use once_cell::sync::Lazy;
    use std::path::PathBuf;

    pub static FIXTURES_DIR: Lazy<PathBuf> =
        Lazy::new(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures"));

    /// Get path to a fixture file as a string argument
    pub fn fixture(name: &str) -> String {
        FIXTURES_DIR.join(name).to_string_lossy().to_string()
    }
}

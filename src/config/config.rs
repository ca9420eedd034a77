//! Config file handling
//!
//! ```toml
//! [defaults]
//! options = ["--prettyprint"]
//!
//! [curl]
//! flags = ["--silent", "--show-error"]
//!
//! [shell]
//! program = "bash"
//! field_timeout = 1.0
//! timeout = 5.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::CurlTemplateError;
use crate::expand::shell::{DEFAULT_FIELD_TIMEOUT, DEFAULT_SHELL, DEFAULT_TIMEOUT};

/// Overrides the config directory
pub const CONFIG_DIR_ENV: &str = "CURL_TEMPLATE_CONFIG_DIR";

/// Shell expansion settings
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub program: String,
    pub field_timeout: Duration,
    pub timeout: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_SHELL.to_string(),
            field_timeout: DEFAULT_FIELD_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// curl-template configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    /// Flags prepended to the command line arguments
    pub default_options: Vec<String>,
    /// Extra curl flags placed before the ones given with `--flags`
    pub curl_flags: Vec<String>,
    pub shell: ShellConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            default_options: Vec::new(),
            curl_flags: Vec::new(),
            shell: ShellConfig::default(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the config directory
    pub fn load() -> Result<Self, CurlTemplateError> {
        Self::load_from(&Self::default_config_dir())
    }

    /// Load `config.toml` from `config_dir`; a missing file yields defaults
    pub fn load_from(config_dir: &Path) -> Result<Self, CurlTemplateError> {
        let config_file = config_dir.join("config.toml");

        if !config_file.exists() {
            return Ok(Self {
                config_dir: config_dir.to_path_buf(),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| CurlTemplateError::Config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::parse(&content)?;
        config.config_dir = config_dir.to_path_buf();
        Ok(config)
    }

    /// Parse config TOML content
    pub fn parse(content: &str) -> Result<Self, CurlTemplateError> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| CurlTemplateError::Config(format!("Invalid config TOML: {}", e)))?;

        let default_options = string_array(&toml_value, "defaults", "options")?;
        let curl_flags = string_array(&toml_value, "curl", "flags")?;

        let mut shell = ShellConfig::default();
        if let Some(section) = toml_value.get("shell") {
            if let Some(program) = section.get("program") {
                shell.program = program
                    .as_str()
                    .ok_or_else(|| CurlTemplateError::Config("shell.program must be a string".to_string()))?
                    .to_string();
            }
            if let Some(value) = section.get("field_timeout") {
                shell.field_timeout = seconds(value, "shell.field_timeout")?;
            }
            if let Some(value) = section.get("timeout") {
                shell.timeout = seconds(value, "shell.timeout")?;
            }
        }

        Ok(Self {
            config_dir: Self::default_config_dir(),
            default_options,
            curl_flags,
            shell,
        })
    }

    /// `$CURL_TEMPLATE_CONFIG_DIR`, else the platform config directory
    pub fn default_config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|p| p.join("curl-template"))
            .unwrap_or_else(|| PathBuf::from(".curl-template"))
    }
}

fn string_array(toml: &toml::Value, section: &str, key: &str) -> Result<Vec<String>, CurlTemplateError> {
    let Some(value) = toml.get(section).and_then(|s| s.get(key)) else {
        return Ok(Vec::new());
    };

    let invalid = || CurlTemplateError::Config(format!("{}.{} must be an array of strings", section, key));

    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(String::from).ok_or_else(invalid))
        .collect()
}

fn seconds(value: &toml::Value, key: &str) -> Result<Duration, CurlTemplateError> {
    let secs = value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
        .ok_or_else(|| CurlTemplateError::Config(format!("{} must be a number of seconds", key)))?;

    Duration::try_from_secs_f64(secs)
        .map_err(|_| CurlTemplateError::Config(format!("{} must be a non-negative number of seconds", key)))
}

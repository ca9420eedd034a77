//! Configuration file handling

mod config;

pub use config::{Config, ShellConfig, CONFIG_DIR_ENV};

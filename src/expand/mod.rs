//! Field expansion
//!
//! - **Environment**: `$NAME` / `${NAME}` substitution from the environment
//! - **Shell**: every field evaluated as a heredoc by a shell interpreter
//!
//! At most one expander runs over a request.

pub mod env;
pub mod shell;

pub use env::{expand_env, EnvVars};
pub use shell::ShellExpander;

//! curl-template library interface
//!
//! Turns a hand-written HTTP request description into a curl command line.
//!
//! # Module Organization
//!
//! - [`request`] - Request model and the JSON / request file parsers
//! - [`expand`] - Environment and shell expansion of request fields
//! - [`curl`] - Curl command generation and shell quoting
//! - [`errors`] - Error types (CurlTemplateError, Result)
//! - [`config`] - Configuration file
//! - [`core`] - Main execution logic
//!
//! ```
//! use curl_template::curl::generate_curl_command;
//! use curl_template::request::{load_request, RequestFormat};
//!
//! let request = load_request(b"GET https://example.com/\n", RequestFormat::AUTO).unwrap();
//! assert_eq!(generate_curl_command(&request, false, &[]), "curl 'https://example.com/'");
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod curl;
pub mod errors;
pub mod expand;
pub mod request;
pub mod status;

pub use errors::{CurlTemplateError, ExpansionError, Result};
pub use request::{HeaderField, HttpRequest, HttpVersion};

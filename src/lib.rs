//! rsapi library interface
//!
//! Signs, instruments and sends single HTTP requests, then loads the JSON
//! response body into a generic value.
//!
//! # Module Organization
//!
//! - [`client`] - Request dispatch (`Api`), transport seam, response decoding
//! - [`middleware`] - Request signing (`Signer`, `Auth`)
//! - [`output`] - Diagnostics: log sink, correlation ids, wire dumps
//! - [`config`] - TOML/environment configuration
//! - [`errors`] - Error types (ApiError, Result)

pub mod client;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod output;

pub use client::{load_response, Api, DispatchOptions, Response, Transport, TransportError};
pub use config::{ApiConfig, ConfigError};
pub use errors::{ApiError, Result};
pub use middleware::{Auth, AuthError, Signer};
pub use output::{DumpOutput, Logger, SharedBuffer, TracingLogger};

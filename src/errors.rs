//! Error types for rsapi

use thiserror::Error;

use crate::client::TransportError;
use crate::middleware::AuthError;

/// Error returned by request dispatch and response loading
#[derive(Error, Debug)]
pub enum ApiError {
    /// The signer refused or failed to sign the request
    #[error(transparent)]
    Sign(AuthError),

    /// The network exchange failed
    #[error(transparent)]
    Transport(TransportError),

    /// The response body could not be read to the end
    #[error("failed to read response ({0})")]
    Read(#[source] std::io::Error),

    /// The response body was read but is not valid JSON
    #[error("failed to load response ({0})")]
    Parse(#[source] serde_json::Error),

    /// The request URL built from host and path does not parse
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

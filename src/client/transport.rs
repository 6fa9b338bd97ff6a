//! Network transport seam

use std::future::Future;

use reqwest::Request;
use thiserror::Error;

use super::Response;

/// Transport error types
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure raised by a caller-supplied transport
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wrap an arbitrary transport failure
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TransportError::Custom(err.into())
    }
}

/// Performs the actual network round trip for a signed request
///
/// Timeouts and cancellation belong to the implementation; a cancelled
/// exchange surfaces as an error from `send`.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

impl Transport for reqwest::Client {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let response = self.execute(request).await?;
        Ok(Response::from(response))
    }
}

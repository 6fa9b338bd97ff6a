//! API handle tying a host to its signer and transport

use reqwest::{Method, Request, Url};
use serde_json::Value;

use super::{load_response, DispatchOptions, Transport};
use crate::config::{ApiConfig, ConfigError};
use crate::errors::ApiError;
use crate::middleware::Signer;

/// Handle for one API host
#[derive(Debug, Clone)]
pub struct Api<S, T> {
    host: String,
    scheme: String,
    signer: S,
    transport: T,
}

impl<S: Signer, T: Transport> Api<S, T> {
    /// Create an API handle targeting `https://{host}`
    pub fn new(host: impl Into<String>, signer: S, transport: T) -> Self {
        Self {
            host: host.into(),
            scheme: "https".to_string(),
            signer,
            transport,
        }
    }

    /// Create an API handle from validated configuration
    pub fn from_config(config: &ApiConfig, signer: S, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.host.clone(), signer, transport).with_scheme(config.scheme.clone()))
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build an unsigned request for `path` on this API's host
    pub fn request(&self, method: Method, path: &str) -> Result<Request, ApiError> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let url = Url::parse(&format!("{}://{}{}{}", self.scheme, self.host, separator, path))?;
        Ok(Request::new(method, url))
    }

    /// Dispatch `request` and load its JSON response
    pub async fn request_json(
        &self,
        request: Request,
        options: &DispatchOptions,
    ) -> Result<Option<Value>, ApiError> {
        let response = self.perform_request(request, options).await?;
        load_response(response).await
    }
}

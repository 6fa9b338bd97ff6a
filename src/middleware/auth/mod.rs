//! Built-in authentication schemes
//!
//! Each scheme writes a single header. Anything more involved implements
//! [`Signer`](super::Signer) directly.

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use thiserror::Error;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("missing credentials")]
    MissingCredentials,

    /// Failure raised by a caller-supplied signer
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
    /// Wrap an arbitrary signer failure
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        AuthError::Custom(err.into())
    }
}

/// Header-based authentication scheme
#[derive(Clone)]
pub enum Auth {
    /// HTTP Basic (RFC 7617)
    Basic { username: String, password: String },
    /// Bearer token (RFC 6750)
    Bearer { token: String },
    /// API key in a custom header
    ApiKey { header: String, key: String },
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer { token: token.into() }
    }

    pub fn api_key(header: impl Into<String>, key: impl Into<String>) -> Self {
        Auth::ApiKey {
            header: header.into(),
            key: key.into(),
        }
    }

    /// Write the credential header, replacing any previous value
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), AuthError> {
        let (name, value) = match self {
            Auth::Basic { username, password } => {
                if username.is_empty() {
                    return Err(AuthError::MissingCredentials);
                }
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                (AUTHORIZATION, format!("Basic {}", encoded))
            }
            Auth::Bearer { token } => (AUTHORIZATION, format!("Bearer {}", token)),
            Auth::ApiKey { header, key } => {
                let name = HeaderName::try_from(header.as_str())
                    .map_err(|e| AuthError::InvalidHeader(format!("invalid header name: {}", e)))?;
                (name, key.clone())
            }
        };

        let mut value = HeaderValue::from_str(&value)
            .map_err(|e| AuthError::InvalidHeader(e.to_string()))?;
        value.set_sensitive(true);

        headers.insert(name, value);
        Ok(())
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Auth::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Auth::ApiKey { header, .. } => f
                .debug_struct("ApiKey")
                .field("header", header)
                .field("key", &"***")
                .finish(),
        }
    }
}

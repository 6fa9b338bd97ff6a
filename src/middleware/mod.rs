//! Request signing middleware
//!
//! A [`Signer`] adds authentication material to an outbound request right
//! before it goes out on the wire.

pub mod auth;

pub use auth::{Auth, AuthError};

use reqwest::Request;

/// Adds authentication proof to a request
///
/// `host` is the API host the request is aimed at, for schemes that scope
/// credentials per host. Implementations only touch headers.
pub trait Signer: Send + Sync {
    fn sign(&self, request: &mut Request, host: &str) -> Result<(), AuthError>;
}

impl<F> Signer for F
where
    F: Fn(&mut Request, &str) -> Result<(), AuthError> + Send + Sync,
{
    fn sign(&self, request: &mut Request, host: &str) -> Result<(), AuthError> {
        self(request, host)
    }
}

impl Signer for Auth {
    fn sign(&self, request: &mut Request, _host: &str) -> Result<(), AuthError> {
        self.apply(request.headers_mut())
    }
}

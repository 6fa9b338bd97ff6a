//! HTTP client functionality

pub mod api;
pub mod dispatch;
pub mod response;
pub mod transport;

// Re-exports
pub use api::Api;
pub use dispatch::DispatchOptions;
pub use response::{load_response, Body, Response};
pub use transport::{Transport, TransportError};

//! Diagnostic output (log lines, correlation ids, wire dumps)

pub mod dump;
pub mod logger;

pub use dump::{format_request, format_response_head, DumpOutput, SharedBuffer};
pub use logger::{correlation_id, Logger, TracingLogger};

//! Request log sink and correlation ids

use base64::Engine;
use rand::Rng;

/// Number of random bytes behind a correlation id
const CORRELATION_ID_BYTES: usize = 6;

/// Sink for request/response log lines
///
/// Shared across concurrent dispatches, so implementations serialize their
/// own writes. Interleaved lines are fine, torn lines are not.
pub trait Logger: Send + Sync {
    fn log(&self, line: &str);
}

impl std::fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Logger")
    }
}

/// Logger that forwards every line to `tracing` at INFO level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, line: &str) {
        tracing::info!(target: "rsapi", "{}", line);
    }
}

/// Generate a short random token tying a request log line to its response line
///
/// Six random bytes, standard base64 with padding.
pub fn correlation_id() -> String {
    let mut bytes = [0u8; CORRELATION_ID_BYTES];
    rand::rng().fill(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

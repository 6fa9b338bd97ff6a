//! Signed, instrumented request dispatch

use std::sync::Arc;
use std::time::Instant;

use http_body_util::BodyExt;
use reqwest::{Body, Request};

use super::{Api, Response, Transport, TransportError};
use crate::errors::ApiError;
use crate::middleware::Signer;
use crate::output::{correlation_id, format_request, format_response_head, DumpOutput, Logger};

/// Per-call diagnostics
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Log sink; `None` disables logging and correlation ids entirely
    pub logger: Option<Arc<dyn Logger>>,
    /// Dump the request (with body) and the response head
    pub dump_request_response: bool,
    /// Where dumps go, standard output by default
    pub dump_output: DumpOutput,
}

impl DispatchOptions {
    /// No logging, no dumps
    pub fn quiet() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_dump(mut self, output: DumpOutput) -> Self {
        self.dump_request_response = true;
        self.dump_output = output;
        self
    }
}

/// Log/timing state carried from the request line to the response line
struct Trace<'a> {
    logger: &'a dyn Logger,
    id: String,
    started_at: Instant,
}

impl<S: Signer, T: Transport> Api<S, T> {
    /// Log and dump the request, sign it, send it, then log and dump the response
    ///
    /// Signing happens after the request has been logged and dumped so that
    /// credentials never end up in diagnostics. Signer and transport errors
    /// abort the call as they are; the response side is only logged once a
    /// response exists.
    pub async fn perform_request(
        &self,
        mut request: Request,
        options: &DispatchOptions,
    ) -> Result<Response, ApiError> {
        let trace = options.logger.as_deref().map(|logger| {
            let started_at = Instant::now();
            let id = correlation_id();
            logger.log(&format!("[{}] {} {}", id, request.method(), request.url()));
            Trace {
                logger,
                id,
                started_at,
            }
        });

        if options.dump_request_response {
            if let Err(e) = buffer_body(&mut request).await {
                tracing::warn!(error = %e, url = %request.url(), "Failed to buffer request body for dump");
                return Err(ApiError::Transport(TransportError::Http(e)));
            }
            options
                .dump_output
                .write_section("REQUEST", &format_request(&request), "\n\n");
        }

        self.signer()
            .sign(&mut request, self.host())
            .map_err(ApiError::Sign)?;

        let response = self
            .transport()
            .send(request)
            .await
            .map_err(ApiError::Transport)?;

        if let Some(trace) = trace {
            let elapsed = trace.started_at.elapsed();
            trace.logger.log(&format!(
                "[{}] {} in {:?}",
                trace.id,
                response.status_text(),
                elapsed
            ));
        }

        if options.dump_request_response {
            options
                .dump_output
                .write_section("RESPONSE", &format_response_head(&response), "");
        }

        Ok(response)
    }
}

/// Swap a streaming body for its collected bytes so it can be dumped and still sent
///
/// On failure the stream has been consumed and the request cannot be sent.
async fn buffer_body(request: &mut Request) -> Result<(), reqwest::Error> {
    if request.body().is_none_or(|body| body.as_bytes().is_some()) {
        return Ok(());
    }
    if let Some(body) = request.body_mut().take() {
        let bytes = body.collect().await?.to_bytes();
        *request.body_mut() = Some(Body::from(bytes));
    }
    Ok(())
}

//! Common test utilities for rsapi integration tests
//!
//! This module provides shared test infrastructure including:
//! - A transport spy that counts sends and records what it was given
//! - A logger that records every line
//! - Response body doubles that count how often they are released

#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Request, StatusCode};
use tokio::io::{AsyncRead, ReadBuf};

use rsapi::{AuthError, Logger, Response, Transport, TransportError};

/// Host every test API is configured with
pub const HOST: &str = "api.example.com";

/// Header added by [`signing_header`]
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Route `tracing` output to the test harness; `RUST_LOG` controls the filter
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rsapi=info")),
        )
        .with_test_writer()
        .try_init();
}

/// Logger keeping every line in memory
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// What a [`SpyTransport`] answers with
#[derive(Debug, Clone)]
pub enum Reply {
    Respond {
        status: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
    },
    Fail(String),
}

/// Transport double counting sends and keeping the headers and bodies it saw
#[derive(Debug)]
pub struct SpyTransport {
    reply: Reply,
    calls: AtomicUsize,
    seen: Mutex<Vec<HeaderMap>>,
    bodies: Mutex<Vec<Option<Vec<u8>>>>,
}

impl SpyTransport {
    pub fn responding(status: StatusCode, body: &str) -> Self {
        Self::with_reply(Reply::Respond {
            status,
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        })
    }

    pub fn responding_with_header(status: StatusCode, name: &'static str, value: &'static str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        Self::with_reply(Reply::Respond {
            status,
            headers,
            body: Vec::new(),
        })
    }

    pub fn failing(message: &str) -> Self {
        Self::with_reply(Reply::Fail(message.to_string()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_headers(&self) -> Vec<HeaderMap> {
        self.seen.lock().unwrap().clone()
    }

    /// Buffered request bodies; `None` for no body or a still-streaming one
    pub fn seen_bodies(&self) -> Vec<Option<Vec<u8>>> {
        self.bodies.lock().unwrap().clone()
    }
}

impl Transport for SpyTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.headers().clone());
        self.bodies
            .lock()
            .unwrap()
            .push(request.body().and_then(|b| b.as_bytes()).map(|b| b.to_vec()));

        match &self.reply {
            Reply::Respond { status, headers, body } => {
                Ok(Response::new(*status, headers.clone(), io::Cursor::new(body.clone())))
            }
            Reply::Fail(message) => Err(TransportError::custom(message.clone())),
        }
    }
}

/// Signer adding [`SIGNATURE_HEADER`] derived from the host
pub fn signing_header(request: &mut Request, host: &str) -> Result<(), AuthError> {
    let value = HeaderValue::from_str(&format!("sig-for-{}", host))
        .map_err(|e| AuthError::InvalidHeader(e.to_string()))?;
    request.headers_mut().insert(SIGNATURE_HEADER, value);
    Ok(())
}

/// Signer that always refuses
pub fn refusing(_request: &mut Request, _host: &str) -> Result<(), AuthError> {
    Err(AuthError::custom("credentials expired"))
}

/// Body double counting how many times it is released
pub struct CountingBody {
    data: Vec<u8>,
    pos: usize,
    fail: bool,
    releases: Arc<AtomicUsize>,
}

impl CountingBody {
    /// Body yielding `data`, then EOF
    pub fn new(data: &str) -> (Self, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        let body = Self {
            data: data.as_bytes().to_vec(),
            pos: 0,
            fail: false,
            releases: releases.clone(),
        };
        (body, releases)
    }

    /// Body whose every read fails
    pub fn failing() -> (Self, Arc<AtomicUsize>) {
        let (mut body, releases) = Self::new("");
        body.fail = true;
        (body, releases)
    }
}

impl AsyncRead for CountingBody {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.fail {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")));
        }

        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..n]);
        self.pos += n;
        Poll::Ready(Ok(()))
    }
}

impl Drop for CountingBody {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

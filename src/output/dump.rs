//! Raw wire dumps of requests and responses
//!
//! Dumps are written in HTTP/1.x wire form: request line or status line,
//! headers with CRLF endings, a blank line, and for requests the body.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use reqwest::header::{HeaderMap, HOST};
use reqwest::Request;

use crate::client::Response;

/// Destination for wire dumps
///
/// Cheap to clone; clones share the same sink and writes are serialized
/// through a mutex so concurrent dumps never tear.
#[derive(Clone)]
pub struct DumpOutput {
    sink: Arc<Mutex<dyn Write + Send>>,
}

impl DumpOutput {
    /// Dump to any writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(writer)),
        }
    }

    /// Dump to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Dump to standard error
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write one titled section
    ///
    /// Failures are reported through `tracing` and otherwise ignored: a
    /// broken diagnostic sink must not fail the request.
    pub(crate) fn write_section(&self, title: &str, content: &[u8], trailer: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(e) = write_titled(&mut *sink, title, content, trailer) {
            tracing::warn!(error = %e, section = title, "Failed to write dump");
        }
    }
}

impl Default for DumpOutput {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for DumpOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DumpOutput").finish_non_exhaustive()
    }
}

/// In-memory byte sink that can be read back after dumping
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Contents decoded as UTF-8, lossily
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Wire form of a request, headers and full body
///
/// Streaming bodies have no bytes to show; buffer them first (dispatch
/// does) or they are left out.
pub fn format_request(request: &Request) -> Vec<u8> {
    let url = request.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut out = Vec::new();
    out.extend_from_slice(
        format!("{} {} {:?}\r\n", request.method(), target, request.version()).as_bytes(),
    );

    if !request.headers().contains_key(HOST) {
        if let Some(host) = url.host_str() {
            let host = match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
            out.extend_from_slice(format!("Host: {}\r\n", host).as_bytes());
        }
    }

    write_headers(&mut out, request.headers());
    out.extend_from_slice(b"\r\n");

    if let Some(body) = request.body().and_then(|b| b.as_bytes()) {
        out.extend_from_slice(body);
    }

    out
}

/// Wire form of a response's status line and headers; the body is never read
pub fn format_response_head(response: &Response) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(
        format!("{:?} {}\r\n", response.version(), response.status_text()).as_bytes(),
    );
    write_headers(&mut out, response.headers());
    out.extend_from_slice(b"\r\n");
    out
}

fn write_titled(sink: &mut dyn Write, title: &str, content: &[u8], trailer: &str) -> io::Result<()> {
    writeln!(sink, "{}", title)?;
    writeln!(sink, "{}", "-".repeat(title.len()))?;
    sink.write_all(content)?;
    sink.write_all(trailer.as_bytes())?;
    sink.flush()
}

fn write_headers(out: &mut Vec<u8>, headers: &HeaderMap) {
    for (name, value) in headers {
        out.extend_from_slice(canonical_header_name(name.as_str()).as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
}

/// `content-type` -> `Content-Type`
fn canonical_header_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        upper = c == '-';
    }
    result
}

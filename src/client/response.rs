//! Inbound responses and JSON body loading

use std::pin::Pin;

use futures::TryStreamExt;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{StatusCode, Version};
use serde_json::{Map, Value};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::StreamReader;

use crate::errors::ApiError;

/// Response body stream
pub type Body = Pin<Box<dyn AsyncRead + Send>>;

/// An HTTP response whose body has not been read yet
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl AsyncRead + Send + 'static) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers,
            body: Box::pin(body),
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Status code and reason phrase, e.g. `200 OK`
    pub fn status_text(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        }
    }

    /// Split into headers and body stream
    pub fn into_parts(self) -> (HeaderMap, Body) {
        (self.headers, self.body)
    }
}

impl From<reqwest::Response> for Response {
    fn from(response: reqwest::Response) -> Self {
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let stream = response.bytes_stream().map_err(std::io::Error::other);

        Self::new(status, headers, StreamReader::new(stream)).with_version(version)
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Read the whole response body and load it as JSON
///
/// An empty body loads as `None`. A non-empty `Location` header replaces
/// whatever the body held with `{"Location": <header>}`; the header is only
/// looked at once the body has been read and parsed successfully.
pub async fn load_response(response: Response) -> Result<Option<Value>, ApiError> {
    let (headers, mut body) = response.into_parts();

    let mut raw = Vec::new();
    let read = body.read_to_end(&mut raw).await;
    drop(body);
    read.map_err(ApiError::Read)?;

    let mut value = if raw.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&raw).map_err(ApiError::Parse)?)
    };

    if let Some(location) = location_header(&headers) {
        let mut map = Map::new();
        map.insert("Location".to_string(), Value::String(location));
        value = Some(Value::Object(map));
    }

    Ok(value)
}

fn location_header(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(LOCATION)?;
    if value.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(value.as_bytes()).into_owned())
}

//! The HTTP transport boundary.
//!
//! The client never talks to the network directly. Every attempt goes through
//! a [`Transport`], which takes a fully built [`HttpRequest`] and returns the
//! status, headers and body of whatever the server answered. Non-2xx answers
//! are data here, not errors; only failures to get an answer at all are
//! [`TransportError`]s.
//!
//! [`ReqwestTransport`] is the default. Tests substitute their own
//! implementation to script responses without a network.

use crate::request::HttpRequest;
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A raw HTTP response as returned by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// The HTTP status code
    pub status: StatusCode,
    /// The response headers
    pub headers: HeaderMap,
    /// The unparsed response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A failure to obtain any HTTP response.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// An error reported by `reqwest` (connection refused, DNS, TLS, ...).
    #[error(transparent)]
    Http(reqwest::Error),

    /// An I/O error reported by a custom transport.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(err)
        }
    }
}

/// Sends built requests over the wire.
///
/// Implementations must be safe to share between concurrent calls.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use http::StatusCode;
/// use pinata::transport::{Transport, TransportError, TransportResponse};
/// use pinata::HttpRequest;
///
/// struct AlwaysNotFound;
///
/// #[async_trait]
/// impl Transport for AlwaysNotFound {
///     async fn send(&self, _request: &HttpRequest) -> Result<TransportResponse, TransportError> {
///         Ok(TransportResponse::new(StatusCode::NOT_FOUND, ""))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the server's answer.
    async fn send(&self, request: &HttpRequest) -> Result<TransportResponse, TransportError>;
}

/// The default transport, backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an existing `reqwest::Client`.
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Builds a transport with an optional per-request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

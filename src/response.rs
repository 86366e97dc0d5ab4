//! Response decoding.
//!
//! Successful answers wrap their payload in an envelope,
//! `{"data": <payload>}`. [`Response`] carries the unwrapped payload along
//! with details of the HTTP exchange.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// The wire envelope around every payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    /// The payload
    pub data: T,
}

/// A decoded successful response.
///
/// # Examples
///
/// ```no_run
/// use pinata::{Client, Credentials};
/// use pinata::metadata::RequestMetadata;
/// use http::Method;
///
/// # async fn example() -> Result<(), pinata::Error> {
/// let client = Client::builder()
///     .credentials(Credentials::bearer("my-jwt"))
///     .build()?;
///
/// let metadata = RequestMetadata::new(Method::GET, "v3/files/some-id");
/// let response = client.call::<serde_json::Value>(metadata).await?;
///
/// println!("Payload: {}", response.data);
/// println!("Took {:?} over {} attempts", response.latency, response.attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The payload, unwrapped from its envelope.
    pub data: T,

    /// The HTTP status code of the successful attempt.
    pub status: StatusCode,

    /// The headers of the successful attempt.
    pub headers: HeaderMap,

    /// Time from the first attempt until the successful response was received,
    /// backoff included.
    pub latency: Duration,

    /// The number of attempts made, `1` when the first attempt succeeded.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Maps the payload to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pinata::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response {
    ///     data: 42,
    ///     status: StatusCode::OK,
    ///     headers: HeaderMap::new(),
    ///     latency: Duration::from_millis(100),
    ///     attempts: 1,
    /// };
    ///
    /// assert_eq!(response.map(|n| n.to_string()).data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if the request required retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Decodes a JSON document into `T`.
///
/// # Errors
///
/// Returns [`Error::DecodingFailed`] on malformed JSON or a shape mismatch.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        let raw_response = String::from_utf8_lossy(body).into_owned();
        tracing::error!(
            error = %e,
            raw_response = %raw_response,
            "Failed to decode response"
        );
        Error::DecodingFailed {
            message: e.to_string(),
            raw_response,
        }
    })
}

/// Decodes an enveloped payload and unwraps it.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    decode_json::<Envelope<T>>(body).map(|envelope| envelope.data)
}

/// Checks the body of a call whose payload is not used.
///
/// An empty body is accepted; anything else must be valid JSON.
pub fn decode_empty(body: &[u8]) -> Result<()> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    decode_json::<serde::de::IgnoredAny>(body).map(|_| ())
}

//! Error types for Pinata API calls.
//!
//! Every failed call surfaces exactly one [`Error`]. The variants split into
//! two groups: failures that retrying cannot fix (bad requests, auth and
//! missing resources, encoding and decoding problems) and transient ones
//! (overloaded or failing servers, network faults) that the client retries
//! before giving up.

use crate::transport::TransportError;
use http::StatusCode;

/// The main error type for Pinata API calls.
///
/// # Examples
///
/// ```no_run
/// use pinata::{Client, Credentials, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .credentials(Credentials::bearer("my-jwt"))
///     .build()?;
///
/// match client.get_file("file-id").await {
///     Ok(file) => println!("Found {}", file.cid),
///     Err(Error::NotFound) => eprintln!("No such file"),
///     Err(Error::BadRequest(message)) => eprintln!("Rejected: {}", message),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API rejected the request (HTTP 400).
    ///
    /// Holds the response body verbatim, which is where the API explains
    /// what was wrong with the request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The credentials were rejected (HTTP 401).
    #[error("Unauthorized: check the JWT or API key pair")]
    Unauthorized,

    /// The requested resource does not exist (HTTP 404).
    #[error("Resource not found")]
    NotFound,

    /// The server answered with a status outside the success, 400, 401 and
    /// 404 cases.
    ///
    /// 429, 500, 502, 503 and 504 are retried before this is surfaced;
    /// every other status is surfaced on the first occurrence.
    #[error("Server error {status}: {raw_response}")]
    ServerError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// The request body could not be encoded.
    #[error("Failed to encode request: {0}")]
    EncodingFailed(String),

    /// A successful response could not be decoded into the expected type.
    ///
    /// Also returned for timestamps that match neither accepted ISO-8601
    /// form.
    #[error("Failed to decode response: {message}")]
    DecodingFailed {
        /// The decoder's error message
        message: String,
        /// The text that failed to decode
        raw_response: String,
    },

    /// The transport failed before an HTTP status was received.
    #[error("Network error: {0}")]
    NetworkError(#[from] TransportError),

    /// A request URL could not be assembled from the given path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The client was configured incorrectly.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The call was cancelled through the client's cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// A failure that fits no other category.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Returns `true` if the client retries this error.
    ///
    /// Network faults are retryable, as are server errors carrying 429, 500,
    /// 502, 503 or 504. Everything else is terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinata::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::ServerError {
    ///     status: StatusCode::SERVICE_UNAVAILABLE,
    ///     raw_response: String::new(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::ServerError {
    ///     status: StatusCode::FORBIDDEN,
    ///     raw_response: String::new(),
    /// };
    /// assert!(!err.is_retryable());
    /// assert!(!Error::NotFound.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::NetworkError(_) => true,
            Error::ServerError { status, .. } => crate::retry::is_retryable_status(*status),
            Error::BadRequest(_)
            | Error::Unauthorized
            | Error::NotFound
            | Error::EncodingFailed(_)
            | Error::DecodingFailed { .. }
            | Error::InvalidUrl(_)
            | Error::ConfigurationError(_)
            | Error::Cancelled
            | Error::Unknown(_) => false,
        }
    }

    /// Returns the HTTP status code this error was classified from, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            Error::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Error::NotFound => Some(StatusCode::NOT_FOUND),
            Error::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::BadRequest(message) => Some(message),
            Error::ServerError { raw_response, .. } => Some(raw_response),
            Error::DecodingFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Pinata API calls.
pub type Result<T> = std::result::Result<T, Error>;

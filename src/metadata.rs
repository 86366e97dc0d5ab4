//! Operation descriptors.
//!
//! A [`RequestMetadata`] says what one API call should send: which host,
//! method and path, which query parameters and which body. It is built by an
//! endpoint method, turned into an [`HttpRequest`](crate::HttpRequest) once,
//! and dropped when the call resolves.

use crate::multipart::Multipart;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

/// The API host a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// Metadata, listing, group and swap operations.
    Api,
    /// File ingestion.
    Upload,
}

/// The body of a request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// A JSON document, already encoded.
    Json(Vec<u8>),
    /// A `multipart/form-data` form.
    Multipart(Multipart),
}

/// Metadata for an individual API call.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The host the path is resolved against.
    pub host: Host,

    /// The request path, relative to the host.
    pub path: String,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters, in the order they were added.
    pub query_params: Vec<(String, String)>,

    /// The request body.
    pub body: RequestBody,
}

impl RequestMetadata {
    /// Creates metadata for a body-less request against the API host.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            host: Host::Api,
            path: path.into(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Sends the request to the given host instead of the API host.
    pub fn on_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// Adds a header to the request.
    ///
    /// Credential headers are applied after these and always win.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    ///
    /// An empty value is still sent, as `key=`.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Adds a query parameter only when a value is present.
    pub fn with_optional_query_param<V: ToString>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.with_query_param(key, value),
            None => self,
        }
    }

    /// Encodes `body` as the JSON body of the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodingFailed`](crate::Error::EncodingFailed) if the
    /// body cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, crate::Error> {
        let encoded =
            serde_json::to_vec(body).map_err(|e| crate::Error::EncodingFailed(e.to_string()))?;
        self.body = RequestBody::Json(encoded);
        Ok(self)
    }

    /// Uses `form` as the multipart body of the request.
    pub fn with_multipart(mut self, form: Multipart) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

/// Checks that a caller-supplied identifier is usable as one path segment.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) for empty values,
/// values containing `/`, `\`, `?` or `#`, and dot segments (`.`, `..`,
/// including their `%2e` spellings) that URL resolution would collapse.
pub(crate) fn path_segment(value: &str) -> Result<&str, crate::Error> {
    if value.is_empty() || value.contains(['/', '\\', '?', '#']) || is_dot_segment(value) {
        return Err(crate::Error::InvalidUrl(value.to_string()));
    }
    Ok(value)
}

fn is_dot_segment(value: &str) -> bool {
    let decoded = value.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot encode this"))
        }
    }

    #[test]
    fn optional_query_params_are_skipped_when_absent() {
        let metadata = RequestMetadata::new(Method::GET, "v3/files")
            .with_optional_query_param("limit", Some(10))
            .with_optional_query_param::<String>("pageToken", None)
            .with_optional_query_param("group", Some(""));

        assert_eq!(
            metadata.query_params,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("group".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn json_body_is_encoded_eagerly() {
        let metadata = RequestMetadata::new(Method::POST, "v3/files/groups")
            .with_json(&serde_json::json!({"name": "docs"}))
            .unwrap();

        match metadata.body {
            RequestBody::Json(bytes) => assert_eq!(bytes, br#"{"name":"docs"}"#),
            other => panic!("Expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn encoding_failure_is_reported() {
        let result = RequestMetadata::new(Method::POST, "v3/files").with_json(&Unencodable);
        match result {
            Err(crate::Error::EncodingFailed(message)) => {
                assert!(message.contains("cannot encode this"))
            }
            other => panic!("Expected EncodingFailed, got {:?}", other),
        }
    }

    #[test]
    fn path_segments_must_be_plain() {
        assert_eq!(path_segment("bafy123").unwrap(), "bafy123");
        assert_eq!(path_segment("a..b").unwrap(), "a..b");
        assert_eq!(path_segment("...").unwrap(), "...");
        for bad in ["", "a/b", "a\\b", "a?b=1", "a#frag", ".", "..", "%2e%2e", "%2E.", ".%2e", "%2e"] {
            assert!(matches!(
                path_segment(bad),
                Err(crate::Error::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn invalid_header_is_a_configuration_error() {
        let result = RequestMetadata::new(Method::GET, "v3/files").with_header("bad header", "x");
        assert!(matches!(result, Err(crate::Error::ConfigurationError(_))));
    }
}

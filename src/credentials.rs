//! Authentication modes accepted by the Pinata API.

use crate::{Error, Result};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::fmt;

const API_KEY_HEADER: &str = "pinata_api_key";
const SECRET_API_KEY_HEADER: &str = "pinata_secret_api_key";

/// Credentials used to authenticate every request.
///
/// # Examples
///
/// ```
/// use pinata::Credentials;
///
/// let jwt = Credentials::bearer("abc");
/// assert_eq!(jwt.authorization_header(), "Bearer abc");
/// assert!(jwt.additional_headers().is_empty());
///
/// let keys = Credentials::key_pair("k", "s");
/// assert_eq!(keys.additional_headers().len(), 2);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A scoped JWT, sent as a bearer token.
    Bearer(String),

    /// A legacy API key and secret.
    KeyPair {
        /// The API key
        key: String,
        /// The API secret
        secret: String,
    },
}

impl Credentials {
    /// Creates bearer-token credentials from a JWT.
    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::Bearer(token.into())
    }

    /// Creates key-pair credentials.
    pub fn key_pair(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Credentials::KeyPair {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Returns the value of the `Authorization` header.
    ///
    /// The API accepts the key of a key pair as a bearer token as well.
    pub fn authorization_header(&self) -> String {
        match self {
            Credentials::Bearer(token) => format!("Bearer {}", token),
            Credentials::KeyPair { key, .. } => format!("Bearer {}", key),
        }
    }

    /// Returns the headers sent alongside `Authorization`.
    ///
    /// Empty for bearer tokens, `pinata_api_key` and `pinata_secret_api_key`
    /// for key pairs.
    pub fn additional_headers(&self) -> BTreeMap<&'static str, String> {
        match self {
            Credentials::Bearer(_) => BTreeMap::new(),
            Credentials::KeyPair { key, secret } => BTreeMap::from([
                (API_KEY_HEADER, key.clone()),
                (SECRET_API_KEY_HEADER, secret.clone()),
            ]),
        }
    }

    /// Renders all credential headers into a `HeaderMap`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a credential contains characters
    /// that are not allowed in a header value.
    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, sensitive_value(&self.authorization_header())?);
        for (name, value) in self.additional_headers() {
            headers.insert(HeaderName::from_static(name), sensitive_value(&value)?);
        }
        Ok(headers)
    }
}

fn sensitive_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::try_from(value).map_err(|e| {
        Error::ConfigurationError(format!("Invalid credential header value: {}", e))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
            Credentials::KeyPair { .. } => f
                .debug_struct("KeyPair")
                .field("key", &"<redacted>")
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}

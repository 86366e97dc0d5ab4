//! Client configuration.

use crate::{Credentials, Error, Result};
use url::Url;

/// Immutable configuration owned by a [`Client`](crate::Client).
///
/// # Examples
///
/// ```
/// use pinata::{Config, Credentials};
///
/// let config = Config::new(Credentials::bearer("my-jwt"))
///     .with_gateway_domain("example.mypinata.cloud");
///
/// let url = config.gateway_url("bafybeigdyr").unwrap();
/// assert_eq!(url.as_str(), "https://example.mypinata.cloud/ipfs/bafybeigdyr");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Credentials attached to every request.
    pub credentials: Credentials,

    /// Dedicated gateway domain, used only to build gateway URLs locally.
    pub gateway_domain: Option<String>,
}

impl Config {
    /// Creates a configuration without a gateway domain.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            gateway_domain: None,
        }
    }

    /// Sets the gateway domain.
    pub fn with_gateway_domain(mut self, domain: impl Into<String>) -> Self {
        self.gateway_domain = Some(domain.into());
        self
    }

    /// Reads the configuration from the environment.
    ///
    /// `PINATA_JWT` selects bearer credentials; otherwise both
    /// `PINATA_API_KEY` and `PINATA_API_SECRET` must be set. `PINATA_GATEWAY`
    /// is optional.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if neither credential form is present.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let credentials = match lookup("PINATA_JWT") {
            Some(jwt) => Credentials::bearer(jwt),
            None => match (lookup("PINATA_API_KEY"), lookup("PINATA_API_SECRET")) {
                (Some(key), Some(secret)) => Credentials::key_pair(key, secret),
                _ => {
                    return Err(Error::ConfigurationError(
                        "Set PINATA_JWT, or both PINATA_API_KEY and PINATA_API_SECRET".to_string(),
                    ))
                }
            },
        };

        Ok(Self {
            credentials,
            gateway_domain: lookup("PINATA_GATEWAY"),
        })
    }

    /// Builds the gateway URL serving the given CID.
    ///
    /// A domain without a scheme is served over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no gateway domain is set, and
    /// [`Error::InvalidUrl`] when the result is not a valid URL.
    pub fn gateway_url(&self, cid: &str) -> Result<Url> {
        let domain = self.gateway_domain.as_deref().ok_or_else(|| {
            Error::ConfigurationError("No gateway domain configured".to_string())
        })?;
        let domain = domain.trim_end_matches('/');

        let raw = if domain.contains("://") {
            format!("{}/ipfs/{}", domain, cid)
        } else {
            format!("https://{}/ipfs/{}", domain, cid)
        };

        Url::parse(&raw).map_err(|_| Error::InvalidUrl(raw))
    }
}

//! Request execution with retries and typed error mapping.
//!
//! The [`Client`] type is the entry point for every API call. Use
//! [`ClientBuilder`] to configure and create clients.

use crate::{
    config::Config,
    credentials::Credentials,
    metadata::{Host, RequestMetadata},
    request::{parse_base_url, HttpRequest},
    response::{decode_empty, decode_envelope},
    retry::{Outcome, RetryPolicy},
    transport::{ReqwestTransport, Transport},
    Error, Response, Result,
};
use http::header::USER_AGENT;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Host serving metadata, listing, group and swap operations.
pub const DEFAULT_API_URL: &str = "https://api.pinata.cloud";

/// Host serving uploads.
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.pinata.cloud";

/// A client for the Pinata Files API.
///
/// The client is cheap to clone and safe to share between tasks: all of its
/// state is immutable after construction, and every call keeps its retry
/// bookkeeping to itself.
///
/// # Examples
///
/// ```no_run
/// use pinata::{Client, Credentials, ListFilesQuery};
///
/// # async fn example() -> Result<(), pinata::Error> {
/// let client = Client::builder()
///     .credentials(Credentials::bearer("my-jwt"))
///     .build()?;
///
/// let page = client
///     .list_files(&ListFilesQuery {
///         limit: Some(10),
///         ..Default::default()
///     })
///     .await?;
///
/// for file in page.files {
///     println!("{} {}", file.cid, file.name.unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    cancellation: Option<CancellationToken>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    config: Config,
    api_url: Url,
    upload_url: Url,
    default_headers: HeaderMap,
    credential_headers: HeaderMap,
    retry_policy: RetryPolicy,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with default settings for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the credentials cannot be sent as
    /// headers or the HTTP client cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Creates a client configured from the environment.
    ///
    /// See [`Config::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    /// Returns the client's configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Returns the retry policy applied to every call.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry_policy
    }

    /// Returns a client whose calls stop as soon as `token` is cancelled.
    ///
    /// Cancellation interrupts both an in-flight transport call and a
    /// pending backoff sleep, and the call returns [`Error::Cancelled`].
    /// The returned client shares everything else with `self`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pinata::{Client, Credentials, Error};
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn example() -> Result<(), Error> {
    /// let client = Client::builder()
    ///     .credentials(Credentials::bearer("my-jwt"))
    ///     .build()?;
    ///
    /// let token = CancellationToken::new();
    /// let scoped = client.with_cancellation(token.clone());
    ///
    /// let call = tokio::spawn(async move { scoped.get_file("file-id").await });
    /// token.cancel();
    /// if let Ok(Err(Error::Cancelled)) = call.await {
    ///     println!("Lookup abandoned");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancellation: Some(token),
        }
    }

    /// Builds the gateway URL serving `cid`. No request is made.
    pub fn gateway_url(&self, cid: &str) -> Result<Url> {
        self.inner.config.gateway_url(cid)
    }

    /// Executes a call and decodes its enveloped payload.
    ///
    /// Every endpoint method funnels through here or [`Client::call_empty`].
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
    /// let metadata = RequestMetadata::new(Method::GET, "v3/files/some-id")
    ///     .with_query_param("expand", "true");
    /// let response = client.call::<serde_json::Value>(metadata).await?;
    /// println!("{} after {} attempts", response.data, response.attempts);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<T>(&self, metadata: RequestMetadata) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(&metadata).await?;
        let data = decode_envelope(&response.data)?;
        Ok(response.map(|_| data))
    }

    /// Executes a call whose payload is not needed, such as a delete.
    pub async fn call_empty(&self, metadata: RequestMetadata) -> Result<Response<()>> {
        let response = self.execute(&metadata).await?;
        decode_empty(&response.data)?;
        Ok(response.map(|_| ()))
    }

    /// Executes a call and returns the raw body of the successful attempt.
    ///
    /// The request is built once. Each attempt is classified as success,
    /// retryable failure or terminal failure; retryable failures are retried
    /// after a linear backoff until the retry policy is exhausted, at which
    /// point the most recent failure is returned.
    pub async fn execute(&self, metadata: &RequestMetadata) -> Result<Response<Vec<u8>>> {
        let base_url = match metadata.host {
            Host::Api => &self.inner.api_url,
            Host::Upload => &self.inner.upload_url,
        };
        let request = HttpRequest::build(
            metadata,
            base_url,
            &self.inner.default_headers,
            &self.inner.credential_headers,
        )?;

        let policy = self.inner.retry_policy;
        let start_time = Instant::now();
        let mut last_error = None;

        for attempt in 0..policy.max_attempts() {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt = attempt + 1,
                "Executing HTTP request"
            );

            let result = self
                .cancellable(self.inner.transport.send(&request))
                .await?;

            let error = match Outcome::classify(result) {
                Outcome::Success(response) => {
                    let latency = start_time.elapsed();
                    tracing::info!(
                        status = response.status.as_u16(),
                        latency_ms = latency.as_millis(),
                        attempts = attempt + 1,
                        "Received HTTP response"
                    );
                    return Ok(Response {
                        data: response.body,
                        status: response.status,
                        headers: response.headers,
                        latency,
                        attempts: attempt + 1,
                    });
                }
                Outcome::Terminal(error) => {
                    tracing::error!(
                        error = %error,
                        attempt = attempt + 1,
                        method = %request.method,
                        path = %metadata.path,
                        "Request failed"
                    );
                    return Err(error);
                }
                Outcome::Retryable(error) => error,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt + 1,
                method = %request.method,
                path = %metadata.path,
                "Request failed"
            );

            if let Some(delay) = policy.delay_after(attempt) {
                tracing::info!(
                    delay_ms = delay.as_millis(),
                    attempt = attempt + 1,
                    "Retrying request after delay"
                );
                self.cancellable(tokio::time::sleep(delay)).await?;
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| Error::Unknown("no attempt was made".to_string())))
    }

    /// Runs `future` to completion unless the client's token fires first.
    async fn cancellable<F>(&self, future: F) -> Result<F::Output>
    where
        F: Future,
    {
        let Some(token) = &self.cancellation else {
            return Ok(future.await);
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::info!("Request cancelled");
                Err(Error::Cancelled)
            }
            output = future => Ok(output),
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("api_url", &self.inner.api_url.as_str())
            .field("upload_url", &self.inner.upload_url.as_str())
            .field("retry_policy", &self.inner.retry_policy)
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use pinata::{ClientBuilder, Credentials, RetryPolicy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), pinata::Error> {
/// let client = ClientBuilder::new()
///     .credentials(Credentials::key_pair("key", "secret"))
///     .gateway_domain("example.mypinata.cloud")
///     .timeout(Duration::from_secs(30))
///     .retry_policy(RetryPolicy::new(5, Duration::from_millis(250)))
///     .default_header("x-request-source", "batch-import")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    credentials: Option<Credentials>,
    gateway_domain: Option<String>,
    api_url: Option<Url>,
    upload_url: Option<Url>,
    default_headers: HeaderMap,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("pinata-rs/", env!("CARGO_PKG_VERSION"))),
        );

        Self {
            credentials: None,
            gateway_domain: None,
            api_url: None,
            upload_url: None,
            default_headers,
            retry_policy: RetryPolicy::default(),
            timeout: None,
            transport: None,
        }
    }

    /// Sets the credentials. Required.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the gateway domain used by [`Client::gateway_url`].
    pub fn gateway_domain(mut self, domain: impl Into<String>) -> Self {
        self.gateway_domain = Some(domain.into());
        self
    }

    /// Takes credentials and gateway domain from a [`Config`].
    pub fn config(mut self, config: Config) -> Self {
        self.credentials = Some(config.credentials);
        self.gateway_domain = config.gateway_domain;
        self
    }

    /// Overrides the API host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL is invalid.
    pub fn api_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.api_url = Some(parse_base_url(url.as_ref())?);
        Ok(self)
    }

    /// Overrides the upload host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL is invalid.
    pub fn upload_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.upload_url = Some(parse_base_url(url.as_ref())?);
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// Credential headers cannot be overridden this way.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the retry policy. Defaults to three attempts, 500 ms apart and
    /// growing linearly.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets the per-attempt timeout of the default transport.
    ///
    /// Has no effect on a transport supplied through
    /// [`ClientBuilder::transport`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the default `reqwest` transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials were provided, if they cannot be
    /// sent as headers, or if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let credentials = self
            .credentials
            .ok_or_else(|| Error::ConfigurationError("Credentials are required".to_string()))?;
        let credential_headers = credentials.header_map()?;

        let api_url = match self.api_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_API_URL)?,
        };
        let upload_url = match self.upload_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_UPLOAD_URL)?,
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => {
                if self.timeout.is_some() {
                    tracing::warn!("Timeout is ignored when a custom transport is supplied");
                }
                transport
            }
            None => Arc::new(ReqwestTransport::with_timeout(self.timeout).map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?),
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                config: Config {
                    credentials,
                    gateway_domain: self.gateway_domain,
                },
                api_url,
                upload_url,
                default_headers: self.default_headers,
                credential_headers,
                retry_policy: self.retry_policy,
            }),
            cancellation: None,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

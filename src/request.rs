//! Turns operation descriptors into transport-ready requests.

use crate::metadata::{RequestBody, RequestMetadata};
use crate::{Error, Result};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use url::Url;

/// A fully built request, ready to hand to a
/// [`Transport`](crate::transport::Transport).
///
/// Built once per call and reused unchanged by every retry attempt.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method
    pub method: Method,
    /// The absolute URL, including the query string
    pub url: Url,
    /// All request headers, credentials included
    pub headers: HeaderMap,
    /// The encoded body, if any
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Builds a request from `metadata`.
    ///
    /// Headers are layered in this order, later layers replacing earlier
    /// ones: `default_headers`, the metadata's own headers, the body's
    /// `Content-Type`, and finally `credential_headers`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path cannot be joined onto
    /// `base_url`.
    pub fn build(
        metadata: &RequestMetadata,
        base_url: &Url,
        default_headers: &HeaderMap,
        credential_headers: &HeaderMap,
    ) -> Result<Self> {
        let url = resolve_url(base_url, &metadata.path, &metadata.query_params)?;

        let mut headers = default_headers.clone();
        for (name, value) in &metadata.headers {
            headers.insert(name.clone(), value.clone());
        }

        let body = match &metadata.body {
            RequestBody::Empty => None,
            RequestBody::Json(bytes) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(bytes.clone())
            }
            RequestBody::Multipart(form) => {
                let content_type = HeaderValue::try_from(form.content_type())
                    .map_err(|e| Error::EncodingFailed(format!("Invalid boundary: {}", e)))?;
                headers.insert(CONTENT_TYPE, content_type);
                Some(form.encode())
            }
        };

        for (name, value) in credential_headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(Self {
            method: metadata.method.clone(),
            url,
            headers,
            body,
        })
    }
}

/// Joins `path` onto `base_url` and appends the query string, if any.
fn resolve_url(base_url: &Url, path: &str, query_params: &[(String, String)]) -> Result<Url> {
    let mut url = base_url
        .join(path.trim_start_matches('/'))
        .map_err(|_| Error::InvalidUrl(path.to_string()))?;

    // `query_pairs_mut` on an empty list would still leave a bare `?`.
    if !query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query_params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Normalizes a base URL so relative paths join underneath it.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|_| Error::InvalidUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Network;
    use crate::multipart::Multipart;
    use crate::Credentials;
    use http::header::AUTHORIZATION;

    fn base() -> Url {
        parse_base_url("https://api.pinata.cloud").unwrap()
    }

    fn build(metadata: &RequestMetadata, credentials: &Credentials) -> HttpRequest {
        HttpRequest::build(
            metadata,
            &base(),
            &HeaderMap::new(),
            &credentials.header_map().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn path_is_joined_under_base() {
        let request = build(
            &RequestMetadata::new(Method::GET, "v3/files/abc"),
            &Credentials::bearer("t"),
        );
        assert_eq!(request.url.as_str(), "https://api.pinata.cloud/v3/files/abc");
        assert!(request.body.is_none());
        assert!(request.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let base = parse_base_url("http://localhost:9000/proxy").unwrap();
        let request = HttpRequest::build(
            &RequestMetadata::new(Method::GET, "/v3/files"),
            &base,
            &HeaderMap::new(),
            &HeaderMap::new(),
        )
        .unwrap();
        assert_eq!(request.url.as_str(), "http://localhost:9000/proxy/v3/files");
    }

    #[test]
    fn query_string_only_when_params_present() {
        let bare = build(
            &RequestMetadata::new(Method::GET, "v3/files")
                .with_optional_query_param::<u32>("limit", None),
            &Credentials::bearer("t"),
        );
        assert_eq!(bare.url.query(), None);
        assert!(!bare.url.as_str().ends_with('?'));

        let with_params = build(
            &RequestMetadata::new(Method::GET, "v3/files")
                .with_query_param("limit", 10)
                .with_query_param("pageToken", ""),
            &Credentials::bearer("t"),
        );
        assert_eq!(with_params.url.query(), Some("limit=10&pageToken="));
    }

    #[test]
    fn json_body_sets_content_type() {
        let metadata = RequestMetadata::new(Method::PUT, "v3/files/abc")
            .with_json(&serde_json::json!({"name": "renamed"}))
            .unwrap();
        let request = build(&metadata, &Credentials::bearer("t"));
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.body.unwrap(), br#"{"name":"renamed"}"#);
    }

    #[test]
    fn multipart_body_carries_boundary() {
        let form = Multipart::upload(b"hi".to_vec(), "a.txt", None, Network::Public);
        let boundary = form.boundary().to_string();
        let metadata = RequestMetadata::new(Method::POST, "v3/files").with_multipart(form);
        let request = build(&metadata, &Credentials::bearer("t"));

        assert_eq!(
            request.headers[CONTENT_TYPE].to_str().unwrap(),
            format!("multipart/form-data; boundary={}", boundary)
        );
        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert!(body.starts_with(&format!("--{}\r\n", boundary)));
        assert!(body.ends_with(&format!("--{}--\r\n", boundary)));
    }

    #[test]
    fn credentials_cannot_be_overridden() {
        let metadata = RequestMetadata::new(Method::GET, "v3/files")
            .with_header("authorization", "Bearer forged")
            .unwrap()
            .with_header("pinata_api_key", "forged")
            .unwrap();
        let request = build(&metadata, &Credentials::key_pair("k", "s"));

        assert_eq!(request.headers[AUTHORIZATION], "Bearer k");
        assert_eq!(request.headers["pinata_api_key"], "k");
        assert_eq!(request.headers["pinata_secret_api_key"], "s");
        assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn bearer_mode_sends_only_authorization() {
        let request = build(
            &RequestMetadata::new(Method::GET, "v3/files"),
            &Credentials::bearer("abc"),
        );
        assert_eq!(request.headers[AUTHORIZATION], "Bearer abc");
        assert!(request.headers.get("pinata_api_key").is_none());
        assert!(request.headers.get("pinata_secret_api_key").is_none());
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            parse_base_url("mailto:someone@example.com"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(parse_base_url("not a url"), Err(Error::InvalidUrl(_))));
    }
}

//! Default reqwest-backed [`Requestor`].
//!
//! [`HttpClient`] sends requests exactly as it receives them: the URL is
//! already complete and the headers are already merged. It never follows
//! the response status and never decompresses bodies, so a gzip body reaches
//! [`HttpResponse::decode_body`] untouched.
//!
//! A client built with a connect timeout enforces it on every connection.
//! A client built without one bounds each call by the request's
//! [`timeout`](HttpRequest::timeout) instead, so a configured timeout is
//! never dropped.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::requestor::Requestor;
use crate::error::ConfigError;

/// Crate version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport built on [`reqwest`].
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to share behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tiny_client::HttpClient;
///
/// let client = HttpClient::new(Some(Duration::from_secs(5))).unwrap();
/// assert_eq!(client.connect_timeout(), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    connect_timeout: Option<Duration>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client with the given connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportSetup`] if the underlying reqwest
    /// client cannot be created (e.g. TLS initialization failure).
    pub fn new(connect_timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder.build().map_err(|e| ConfigError::TransportSetup {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            connect_timeout,
        })
    }

    /// Returns the connect timeout the client was built with.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            result
                .entry(name.as_str().to_lowercase())
                .or_default()
                .push(value);
        }
        result
    }

    fn map_error(url: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else {
            TransportError::Network(error)
        }
    }
}

#[async_trait]
impl Requestor for HttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            http_method,
            url,
            headers,
            body,
            timeout,
            ..
        } = request;

        let mut req_builder = match http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = body {
            req_builder = req_builder.body(body);
        }

        if self.connect_timeout.is_none() {
            if let Some(timeout) = timeout {
                req_builder = req_builder.timeout(timeout);
            }
        }

        tracing::trace!(method = %http_method, url = %url, "sending request");

        let res = req_builder
            .send()
            .await
            .map_err(|e| Self::map_error(&url, e))?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let bytes = res.bytes().await.map_err(|e| Self::map_error(&url, e))?;

        tracing::trace!(status = code, url = %url, bytes = bytes.len(), "received response");

        Ok(HttpResponse::new(code, url, res_headers, bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction_without_timeout() {
        let client = HttpClient::new(None).unwrap();
        assert!(client.connect_timeout().is_none());
    }

    #[test]
    fn test_client_keeps_connect_timeout() {
        let client = HttpClient::new(Some(Duration::from_secs(2))).unwrap();
        assert_eq!(client.connect_timeout(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_response_header_names_are_lowercased() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("X-Total-Count", "12".parse().unwrap());
        headers.append("Set-Cookie", "a=1".parse().unwrap());
        headers.append("Set-Cookie", "b=2".parse().unwrap());

        let parsed = HttpClient::parse_response_headers(&headers);
        assert_eq!(parsed.get("x-total-count"), Some(&vec!["12".to_string()]));
        assert_eq!(parsed.get("set-cookie").map(Vec::len), Some(2));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}

//! The single request path shared by every resource operation.

use std::sync::Arc;

use serde_json::Value;

use crate::clients::{DataType, Headers, HttpMethod, HttpRequest, HttpResponse, ResponseError};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::rest::Params;

/// Sends `GET|POST|PUT|DELETE /<path>/<id>/<name>.json` through the
/// configured [`Requestor`](crate::Requestor).
///
/// For every call the client:
///
/// 1. builds the URL from the configured API root (query parameters are
///    only sent with GET)
/// 2. merges the default headers under `Accept` and `Content-Type`
/// 3. JSON-encodes the body, if any
/// 4. turns a response with a status of 400 or above into
///    [`Error::Response`]
///
/// Nothing is retried.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync` and cheap to clone.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tiny_client::{ClientConfig, HttpMethod, Params, RestClient};
///
/// let client = RestClient::new(Arc::new(ClientConfig::builder().build()?));
/// let response = client
///     .request(HttpMethod::Get, "posts", Some("1"), None, &Params::new(), None)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct RestClient {
    config: Arc<ClientConfig>,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a client bound to a configuration.
    #[must_use]
    pub const fn new(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    /// Returns the configuration this client uses.
    #[must_use]
    pub const fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    /// Returns the headers sent with a request of the given method.
    ///
    /// Default headers from the configuration are applied first; `Accept`
    /// and `Content-Type` always override them, whatever their case.
    #[must_use]
    pub fn request_headers(&self, method: HttpMethod) -> Headers {
        let mut headers: Headers = self
            .config
            .headers()
            .iter()
            .filter(|(key, _)| {
                !key.eq_ignore_ascii_case("accept") && !key.eq_ignore_ascii_case("content-type")
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        headers.insert(
            "Accept".to_string(),
            DataType::Json.as_content_type().to_string(),
        );
        headers.insert(
            "Content-Type".to_string(),
            DataType::for_method(method).as_content_type().to_string(),
        );
        headers
    }

    /// Sends one request.
    ///
    /// # Errors
    ///
    /// - [`Error::Argument`] if `body` cannot be encoded, or if a POST/PUT
    ///   has no body (checked before anything is sent)
    /// - [`Error::Transport`] if the call could not be completed
    /// - [`Error::Response`] if the server answered with a status of 400 or above
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        id: Option<&str>,
        name: Option<&str>,
        params: &Params,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let encoded = match body {
            Some(body) if method.has_body() => Some(
                serde_json::to_string(body)
                    .map_err(|e| Error::argument(format!("Request body is not valid JSON: {e}")))?,
            ),
            _ => None,
        };

        let url = if method == HttpMethod::Get {
            self.config.url_for(path, id, name, params)
        } else {
            self.config.url_for(path, id, name, &Params::new())
        };

        let mut builder = HttpRequest::builder(method, url)
            .headers(self.request_headers(method))
            .timeout(self.config.connect_timeout());
        if let Some(encoded) = encoded {
            builder = builder.body(encoded).body_type(DataType::Json);
        }
        let request = builder.build()?;

        if self.config.verbose() {
            tracing::info!(method = %method, url = %request.url, "sending request");
        } else {
            tracing::debug!(method = %method, url = %request.url, "sending request");
        }

        let response = self.config.requestor().execute(request).await?;

        if self.config.verbose() {
            tracing::info!(status = response.code, url = %response.url, "received response");
        } else {
            tracing::debug!(status = response.code, url = %response.url, "received response");
        }

        if response.is_error() {
            tracing::warn!(
                status = response.code,
                url = %response.url,
                "request failed with an error status"
            );
            return Err(ResponseError::new(response).into());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{Requestor, TransportError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Canned {
        status: u16,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16) -> Arc<Self> {
            Arc::new(Self {
                status,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Requestor for Canned {
        async fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            let url = request.url.clone();
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::from_raw(self.status, url, "", "{}"))
        }
    }

    fn client(requestor: Arc<Canned>, config_headers: &[(&str, &str)]) -> RestClient {
        let mut builder = ClientConfig::builder()
            .url(crate::BaseUrl::new("http://api.test").unwrap())
            .requestor(requestor);
        for (key, value) in config_headers {
            builder = builder.header(*key, *value);
        }
        RestClient::new(Arc::new(builder.build().unwrap()))
    }

    #[test]
    fn test_fixed_headers_override_defaults() {
        let client = client(
            Canned::new(200),
            &[("accept", "text/html"), ("X-Api-Key", "k")],
        );

        let headers = client.request_headers(HttpMethod::Get);
        assert_eq!(headers.get("Accept").unwrap(), "application/json");
        assert_eq!(
            headers.get("Content-Type").unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(headers.get("X-Api-Key").unwrap(), "k");
        assert!(!headers.contains_key("accept"));

        let headers = client.request_headers(HttpMethod::Put);
        assert_eq!(headers.get("Content-Type").unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_query_is_only_sent_with_get() {
        let requestor = Canned::new(200);
        let client = client(Arc::clone(&requestor), &[]);
        let params = json!({ "limit": 5 }).as_object().unwrap().clone();

        client
            .request(HttpMethod::Get, "posts", None, None, &params, None)
            .await
            .unwrap();
        client
            .request(HttpMethod::Delete, "posts", Some("1"), None, &params, None)
            .await
            .unwrap();

        let seen = requestor.seen.lock().unwrap();
        assert_eq!(seen[0].url, "http://api.test/posts.json?limit=5");
        assert_eq!(seen[1].url, "http://api.test/posts/1.json");
    }

    #[tokio::test]
    async fn test_body_is_json_encoded() {
        let requestor = Canned::new(201);
        let client = client(Arc::clone(&requestor), &[]);
        let body = json!({ "post": { "name": "toto" } });

        client
            .request(HttpMethod::Post, "posts", None, None, &Params::new(), Some(&body))
            .await
            .unwrap();

        let seen = requestor.seen.lock().unwrap();
        assert_eq!(seen[0].body.as_deref(), Some(r#"{"post":{"name":"toto"}}"#));
    }

    #[tokio::test]
    async fn test_missing_body_fails_before_sending() {
        let requestor = Canned::new(200);
        let client = client(Arc::clone(&requestor), &[]);

        let result = client
            .request(HttpMethod::Put, "posts", Some("1"), None, &Params::new(), None)
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, Error::Argument { .. }));
        assert_eq!(
            error.to_string(),
            "Invalid argument: Cannot use put without specifying data."
        );
        assert!(requestor.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_becomes_response_error() {
        let client = client(Canned::new(404), &[]);

        let error = client
            .request(HttpMethod::Get, "posts", Some("9"), None, &Params::new(), None)
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.to_string(),
            "Error 404 occurred when calling http://api.test/posts/9.json"
        );
    }
}

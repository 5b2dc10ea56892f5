//! The transport seam between resource operations and HTTP.
//!
//! Resource operations never talk to the network directly. They hand a fully
//! resolved [`HttpRequest`] to a [`Requestor`] held by the
//! [`ClientConfig`](crate::ClientConfig). The crate ships
//! [`HttpClient`](crate::HttpClient), a reqwest-backed implementation; tests
//! and embedders may supply their own.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use tiny_client::clients::{HttpRequest, HttpResponse, Requestor, TransportError};
//!
//! #[derive(Debug)]
//! struct AlwaysEmpty;
//!
//! #[async_trait]
//! impl Requestor for AlwaysEmpty {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
//!         Ok(HttpResponse::from_raw(200, request.url, "", "[]"))
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{DataType, Headers, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;

/// Performs HTTP calls on behalf of resource operations.
///
/// Only [`execute`](Requestor::execute) has to be implemented; the four verb
/// methods build the matching [`HttpRequest`] and delegate to it.
///
/// Implementations must return `Ok` for every response the server sent,
/// whatever its status. Status classification happens in the caller.
#[async_trait]
pub trait Requestor: Send + Sync + fmt::Debug {
    /// Sends one request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the call could not be completed.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the call could not be completed.
    async fn get(
        &self,
        url: &str,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        let request = HttpRequest::builder(HttpMethod::Get, url)
            .headers(headers.clone())
            .timeout(timeout)
            .build()?;
        self.execute(request).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the call could not be completed.
    async fn post(
        &self,
        url: &str,
        headers: &Headers,
        body: String,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        let request = HttpRequest::builder(HttpMethod::Post, url)
            .headers(headers.clone())
            .body(body)
            .body_type(DataType::Json)
            .timeout(timeout)
            .build()?;
        self.execute(request).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the call could not be completed.
    async fn put(
        &self,
        url: &str,
        headers: &Headers,
        body: String,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        let request = HttpRequest::builder(HttpMethod::Put, url)
            .headers(headers.clone())
            .body(body)
            .body_type(DataType::Json)
            .timeout(timeout)
            .build()?;
        self.execute(request).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the call could not be completed.
    async fn delete(
        &self,
        url: &str,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        let request = HttpRequest::builder(HttpMethod::Delete, url)
            .headers(headers.clone())
            .timeout(timeout)
            .build()?;
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Requestor for Recorder {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = request.url.clone();
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::from_raw(200, url, "", ""))
        }
    }

    #[tokio::test]
    async fn test_verb_methods_delegate_to_execute() {
        let recorder = Recorder::default();
        let headers = Headers::new();
        let timeout = Some(Duration::from_secs(3));

        recorder.get("/posts.json", &headers, timeout).await.unwrap();
        recorder
            .post("/posts.json", &headers, "{}".to_string(), timeout)
            .await
            .unwrap();
        recorder
            .put("/posts/1.json", &headers, "{}".to_string(), None)
            .await
            .unwrap();
        recorder.delete("/posts/1.json", &headers, None).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        let methods: Vec<_> = seen.iter().map(|r| r.http_method).collect();
        assert_eq!(
            methods,
            vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Put,
                HttpMethod::Delete
            ]
        );
        assert_eq!(seen[0].timeout, timeout);
        assert!(seen[0].body.is_none());
        assert_eq!(seen[1].body.as_deref(), Some("{}"));
        assert_eq!(seen[1].body_type, Some(DataType::Json));
        assert!(seen.iter().all(|r| r.verify().is_ok()));
    }

    #[test]
    fn test_requestor_is_object_safe() {
        let requestor: Box<dyn Requestor> = Box::new(Recorder::default());
        assert!(format!("{requestor:?}").contains("Recorder"));
    }
}

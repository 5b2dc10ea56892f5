//! Connection configuration shared by every resource type.
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: API root, default headers, page limit, connect timeout
//!   and the [`Requestor`] used to reach the API
//! - [`ClientConfigBuilder`]: a builder for constructing [`ClientConfig`] instances
//! - [`BaseUrl`]: a validated API root
//!
//! A configuration is built once by the application and handed to each
//! [`ResourceDescriptor`](crate::ResourceDescriptor) behind an `Arc`. Nothing
//! in the crate mutates it afterwards.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tiny_client::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .url(BaseUrl::new("http://localhost:3000/api/1.0").unwrap())
//!     .header("Authorization", "Token secret")
//!     .limit(50)
//!     .connect_timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.limit(), Some(50));
//! assert!(config.headers().contains_key("User-Agent"));
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use std::sync::Arc;
use std::time::Duration;

use crate::clients::{Headers, HttpClient, Requestor, CLIENT_VERSION};
use crate::error::ConfigError;
use crate::rest::{Params, UrlBuilder};

/// Connection configuration.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`; share it with `Arc`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    url: BaseUrl,
    headers: Headers,
    limit: Option<u32>,
    connect_timeout: Option<Duration>,
    verbose: bool,
    requestor: Arc<dyn Requestor>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API root.
    #[must_use]
    pub const fn url(&self) -> &BaseUrl {
        &self.url
    }

    /// Returns the default headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the default page size, if configured.
    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Returns the connect timeout, if configured.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Returns whether request and response events are logged at `info`.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the transport.
    #[must_use]
    pub fn requestor(&self) -> &dyn Requestor {
        self.requestor.as_ref()
    }

    /// Returns a [`UrlBuilder`] rooted at the configured API root.
    #[must_use]
    pub fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::url(self.url.as_str())
    }

    /// Builds a request URL from a collection path, an optional id, an
    /// optional sub-resource name and query parameters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use tiny_client::{BaseUrl, ClientConfig};
    ///
    /// let config = ClientConfig::builder()
    ///     .url(BaseUrl::new("http://localhost:3000/api/1.0").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// let params = json!({ "id": [1, 2] });
    /// assert_eq!(
    ///     config.url_for("organizations", Some("1"), None, params.as_object().unwrap()),
    ///     "http://localhost:3000/api/1.0/organizations/1.json?id%5B%5D=1&id%5B%5D=2"
    /// );
    /// ```
    #[must_use]
    pub fn url_for(
        &self,
        path: &str,
        id: Option<&str>,
        name: Option<&str>,
        params: &Params,
    ) -> String {
        self.url_builder()
            .path(path)
            .path_opt(id)
            .path_opt(name)
            .query(params)
            .build()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `url`: the root path
/// - `headers`: `User-Agent: tiny-client v<version>` unless one is supplied
/// - `limit`: `None` (pagination falls back to 100)
/// - `connect_timeout`: `None`
/// - `verbose`: `false`
/// - `requestor`: an [`HttpClient`] built with `connect_timeout`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    url: Option<BaseUrl>,
    headers: Headers,
    limit: Option<u32>,
    connect_timeout: Option<Duration>,
    verbose: bool,
    requestor: Option<Arc<dyn Requestor>>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API root.
    #[must_use]
    pub fn url(mut self, url: BaseUrl) -> Self {
        self.url = Some(url);
        self
    }

    /// Adds a default header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds several default headers.
    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the default page size used by pagination.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the connect timeout passed to the transport on every call.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Logs request and response events at `info` instead of `debug`.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets a custom transport.
    #[must_use]
    pub fn requestor(mut self, requestor: Arc<dyn Requestor>) -> Self {
        self.requestor = Some(requestor);
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLimit`] if the limit is 0, and
    /// [`ConfigError::TransportSetup`] if no requestor was supplied and the
    /// default [`HttpClient`] cannot be created.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        if self.limit == Some(0) {
            return Err(ConfigError::InvalidLimit);
        }

        let mut headers = self.headers;
        if !headers
            .keys()
            .any(|key| key.eq_ignore_ascii_case("user-agent"))
        {
            headers.insert(
                "User-Agent".to_string(),
                format!("tiny-client v{CLIENT_VERSION}"),
            );
        }

        let requestor = match self.requestor {
            Some(requestor) => requestor,
            None => Arc::new(HttpClient::new(self.connect_timeout)?),
        };

        Ok(ClientConfig {
            url: self.url.unwrap_or_default(),
            headers,
            limit: self.limit,
            connect_timeout: self.connect_timeout,
            verbose: self.verbose,
            requestor,
        })
    }
}

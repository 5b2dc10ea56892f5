//! Validated newtype wrappers for configuration values.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated API root.
///
/// Accepted forms:
///
/// - empty or `/`: the root path
/// - an absolute path such as `/api/1.0`
/// - an `http` or `https` URL with a host, such as `http://localhost:3000/api`
///
/// The value is stored as given (surrounding whitespace removed); trailing
/// separators are handled by [`UrlBuilder`](crate::UrlBuilder).
///
/// # Serialization
///
/// `BaseUrl` serializes to and deserializes from the plain string:
///
/// ```rust
/// use tiny_client::BaseUrl;
///
/// let url: BaseUrl = serde_json::from_str(r#""http://api.test""#).unwrap();
/// assert_eq!(serde_json::to_string(&url).unwrap(), r#""http://api.test""#);
/// ```
///
/// # Example
///
/// ```rust
/// use tiny_client::BaseUrl;
///
/// let url = BaseUrl::new("http://localhost:3000/api/1.0").unwrap();
/// assert_eq!(url.scheme(), Some("http"));
/// assert_eq!(url.host_name(), Some("localhost"));
///
/// assert!(BaseUrl::new("/").unwrap().is_root());
/// assert!(BaseUrl::new("localhost").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl {
    url: String,
    host: Option<(usize, usize)>,
}

impl BaseUrl {
    const SCHEMES: [&'static str; 2] = ["http", "https"];

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the value is not a root
    /// path, an absolute path, or an `http(s)` URL with a host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url: String = url.into();
        let url = url.trim().to_string();

        if url.is_empty() || url.starts_with('/') {
            return Ok(Self { url, host: None });
        }

        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = url[..scheme_end].to_ascii_lowercase();
        if !Self::SCHEMES.contains(&scheme.as_str()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            host: Some((host_start, host_end)),
            url,
        })
    }

    /// Returns the root base URL (the empty string).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            url: String::new(),
            host: None,
        }
    }

    /// Returns the base URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Returns `true` for an empty base URL or `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.url.is_empty() || self.url == "/"
    }

    /// Returns the URL scheme, or `None` for path-only base URLs.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.host
            .and_then(|_| self.url.find("://"))
            .map(|end| &self.url[..end])
    }

    /// Returns the host name, or `None` for path-only base URLs.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.host.map(|(start, end)| &self.url[start..end])
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

//! Error types for the tiny-client crate.
//!
//! Errors are layered the same way the crate is:
//!
//! - [`ConfigError`]: building a [`ClientConfig`](crate::ClientConfig) failed
//! - [`TransportError`]: the [`Requestor`](crate::Requestor) could not complete a call
//! - [`DecodeError`]: a response body was present but could not be decoded
//! - [`ResponseError`]: the server answered with a status of 400 or above
//! - [`Error`]: the umbrella returned by every resource operation
//!
//! Nothing is retried or swallowed by the crate. Every failure surfaces as
//! exactly one [`Error`] variant carrying enough context (status, URL,
//! offending value) to diagnose it without re-running the call.
//!
//! # Example
//!
//! ```rust
//! use tiny_client::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("ftp:/nowhere");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

pub use crate::clients::{DecodeError, InvalidHttpRequestError, ResponseError, TransportError};

/// Errors that can occur while building a client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL is neither a root path, an absolute path, nor an `http(s)` URL.
    #[error("Invalid base URL '{url}'. Expected '/', an absolute path like '/api', or a URL like 'https://api.example.com'.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The default page limit must be at least 1.
    #[error("Invalid default page limit 0. The limit must be at least 1.")]
    InvalidLimit,

    /// The default HTTP transport could not be created.
    #[error("Could not initialize the HTTP transport: {reason}")]
    TransportSetup {
        /// Why the transport could not be created.
        reason: String,
    },
}

/// Error returned by resource, nested and pagination operations.
///
/// The variants follow the failure taxonomy of the client:
///
/// - [`Error::Argument`]: the caller passed an invalid value (detected locally)
/// - [`Error::MissingId`]: an operation that needs a persisted id was called without one
/// - [`Error::Response`]: the server answered with an error status
/// - [`Error::Transport`]: the request could not be completed
/// - [`Error::Decode`]: the response body is not valid JSON
/// - [`Error::NotImplemented`]: the resource type does not provide the operation
///
/// `Argument`, `MissingId` and `NotImplemented` are always raised before any
/// request is sent.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed an invalid value.
    #[error("Invalid argument: {message}")]
    Argument {
        /// What was wrong with the value.
        message: String,
    },

    /// The operation requires a persisted resource (one with an id).
    #[error("Cannot {operation} {resource}: the resource has no id")]
    MissingId {
        /// The resource type name.
        resource: String,
        /// The operation being attempted (e.g. "load", "destroy").
        operation: &'static str,
    },

    /// The server answered with a status of 400 or above.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The request could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The resource type does not provide this operation.
    #[error("{resource} does not implement {operation}")]
    NotImplemented {
        /// The resource type name.
        resource: String,
        /// The operation that was requested.
        operation: &'static str,
    },

    /// A configuration value was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Creates an [`Error::Argument`] from a message.
    #[must_use]
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code when the server answered with an error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.response.code),
            _ => None,
        }
    }

    /// Returns `true` if the error was detected before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Argument { .. } | Self::MissingId { .. } | Self::NotImplemented { .. }
        )
    }
}

impl From<InvalidHttpRequestError> for Error {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::argument(error.to_string())
    }
}

/// Result alias used by resource operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

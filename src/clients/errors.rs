//! HTTP-level error types.
//!
//! - [`ResponseError`]: the server answered with a status of 400 or above
//! - [`TransportError`]: the request could not be completed at all
//! - [`DecodeError`]: the response body is present but is not valid JSON
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//!
//! # Example
//!
//! ```rust
//! use tiny_client::clients::{HttpResponse, ResponseError};
//!
//! let response = HttpResponse::from_raw(500, "http://api.test/posts.json", "", "");
//! let error = ResponseError::new(response);
//! assert_eq!(
//!     error.to_string(),
//!     "Error 500 occurred when calling http://api.test/posts.json"
//! );
//! ```

use thiserror::Error;

use crate::clients::http_response::HttpResponse;

/// Error returned when the server answers with a status of 400 or above.
///
/// The whole [`HttpResponse`] is kept so callers can inspect the status,
/// URL, headers and body.
#[derive(Debug, Error)]
#[error("Error {} occurred when calling {}", .response.code, .response.url)]
pub struct ResponseError {
    /// The response that carried the error status.
    pub response: HttpResponse,
}

impl ResponseError {
    /// Wraps an error response.
    #[must_use]
    pub const fn new(response: HttpResponse) -> Self {
        Self { response }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.response.code
    }

    /// Returns the URL that was called.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.response.url
    }
}

/// Error returned when a request could not be completed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The call did not complete within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// The URL that was being called.
        url: String,
    },

    /// The request was rejected before it was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Any other transport failure, for custom requestors.
    #[error("Transport error calling {url}: {message}")]
    Other {
        /// The URL that was being called.
        url: String,
        /// What went wrong.
        message: String,
    },
}

/// Error returned when a response body cannot be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The body announced gzip content encoding but could not be inflated.
    #[error("Invalid gzip body: {0}")]
    Gzip(#[from] std::io::Error),
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

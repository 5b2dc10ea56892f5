//! HTTP layer: requests, responses, transports and the REST request path.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Requestor`]: the transport seam (`get`, `post`, `put`, `delete`)
//! - [`HttpClient`]: the default reqwest-backed [`Requestor`]
//! - [`HttpRequest`]: a fully resolved request handed to a [`Requestor`]
//! - [`HttpResponse`]: the raw outcome of one call, with decoding and
//!   status classification
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`DataType`]: content types for requests
//! - [`rest::RestClient`]: builds, sends and classifies resource requests
//!
//! # Retry Behavior
//!
//! There is none. A failed call surfaces exactly once as a
//! [`TransportError`] or, for statuses of 400 and above, a [`ResponseError`].

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod requestor;
pub mod rest;

pub use errors::{DecodeError, InvalidHttpRequestError, ResponseError, TransportError};
pub use http_client::{HttpClient, CLIENT_VERSION};
pub use http_request::{DataType, Headers, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use requestor::Requestor;

pub use rest::RestClient;

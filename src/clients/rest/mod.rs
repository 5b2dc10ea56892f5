//! REST request plumbing used by resource descriptors.
//!
//! [`RestClient`] turns a logical request (method, collection path, optional
//! id and sub-resource name, query parameters, JSON body) into one HTTP call
//! through the configured [`Requestor`](crate::Requestor), and classifies the
//! answer.
//!
//! # Header Merging
//!
//! Default headers from the [`ClientConfig`](crate::ClientConfig) are sent
//! with every request. `Accept: application/json` is always set, and
//! `Content-Type` is `application/x-www-form-urlencoded` for GET and DELETE,
//! `application/json` for POST and PUT. These two win over defaults.

mod client;

pub use client::RestClient;

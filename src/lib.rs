//! # tiny-client
//!
//! A small, declarative client for JSON-over-HTTP APIs. Declare a resource
//! type once (its path, fields and nested children) and get CRUD operations,
//! change-tracked instances and lazy limit/offset pagination for it.
//!
//! ## Overview
//!
//! This crate provides:
//! - Validated configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Resource type declarations via [`ResourceDescriptor`]
//! - Resource instances with by-name field access and partial saves via [`Resource`]
//! - Lazy page and item sequences via [`Pages`] and [`Items`]
//! - Nested collections scoped under a parent id
//! - A pluggable transport via the [`Requestor`] trait, with a reqwest-backed
//!   default ([`HttpClient`])
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tiny_client::{BaseUrl, ClientConfig, ResourceDescriptor};
//!
//! let config = Arc::new(
//!     ClientConfig::builder()
//!         .url(BaseUrl::new("http://localhost:3000/api/1.0").unwrap())
//!         .header("Authorization", "Token secret")
//!         .limit(50)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let post = ResourceDescriptor::builder("Post")
//!     .path("posts")
//!     .fields(["id", "name", "content"])
//!     .build(&config);
//!
//! let mut draft = post.instantiate();
//! draft.set("name", "Hello").unwrap();
//! assert!(draft.is_dirty());
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use tiny_client::Params;
//!
//! // GET /posts.json
//! for post in post.index(&Params::new()).await? {
//!     println!("{:?}", post.get("name"));
//! }
//!
//! // POST /posts.json with {"post":{"name":"Hello"}}
//! draft.save().await?;
//!
//! // GET /posts.json?limit=50&offset=0, then offset=50, ...
//! let everything = post.index_all(&Params::new())?.collect_all().await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is built once and shared explicitly
//! - **Fail-fast validation**: invalid arguments are rejected before any request
//! - **Thread-safe**: configuration, descriptors and resources are `Send + Sync`
//! - **Async-first**: every request is awaited; nothing is spawned
//! - **No retries**: every failure surfaces exactly once as an [`Error`]

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::{ConfigError, Error, Result};

// Re-export HTTP client types
pub use clients::{
    DataType, DecodeError, Headers, HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, InvalidHttpRequestError, Requestor, ResponseError, RestClient, TransportError,
};

// Re-export resource types
pub use rest::{
    Items, Pages, Params, Payload, Records, Resource, ResourceDescriptor,
    ResourceDescriptorBuilder, ResourceId, ResourceRegistry, UrlBuilder,
};

//! Declarative REST resources.
//!
//! This module maps JSON-over-HTTP collections onto resource types:
//!
//! - **[`ResourceDescriptor`]**: the immutable declaration of a type (path,
//!   fields, nested children) with the class-level CRUD operations
//! - **[`Resource`]**: one instance, with by-name field access, change
//!   tracking and `save`/`load`/`destroy`
//! - **[`Payload`] and [`Records`]**: decoded response bodies materialized as
//!   resources
//! - **[`Pages`] and [`Items`]**: lazy limit/offset pagination
//! - **[`UrlBuilder`]**: request URL construction
//! - **[`ResourceRegistry`]**: one descriptor per type name
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tiny_client::{BaseUrl, ClientConfig, Params, ResourceDescriptor};
//!
//! let config = Arc::new(
//!     ClientConfig::builder()
//!         .url(BaseUrl::new("http://localhost:3000/api").unwrap())
//!         .build()?,
//! );
//! let comment = ResourceDescriptor::builder("Comment")
//!     .path("comments")
//!     .fields(["id", "body"])
//!     .build(&config);
//! let post = ResourceDescriptor::builder("Post")
//!     .path("posts")
//!     .fields(["id", "name", "content"])
//!     .nested([&comment])
//!     .build(&config);
//!
//! // GET /posts/1.json
//! let mut first = post.show(1, &Params::new()).await?.unwrap();
//!
//! // PUT /posts/1.json with {"post":{"name":"renamed"}}
//! first.set("name", "renamed")?;
//! first.save().await?;
//!
//! // GET /posts/1/comments.json?limit=100&offset=0, then further pages
//! let mut comments = first.nested_all(&comment, &Params::new())?;
//! while let Some(comment) = comments.next_item().await? {
//!     println!("{:?}", comment.get("body"));
//! }
//! ```

mod descriptor;
mod id;
mod nested;
mod pagination;
mod registry;
mod resource;
mod response;
mod tracking;
mod url_builder;

pub use descriptor::{ResourceDescriptor, ResourceDescriptorBuilder};
pub use id::ResourceId;
pub use pagination::{Items, Pages, DEFAULT_PAGE_LIMIT};
pub use registry::ResourceRegistry;
pub use resource::Resource;
pub use response::{Payload, Records};
pub use tracking::ChangeSet;
pub use url_builder::{to_query, Params, UrlBuilder};

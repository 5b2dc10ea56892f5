//! Resource type declarations and their class-level CRUD operations.
//!
//! A [`ResourceDescriptor`] is built once per resource type and shared by
//! every [`Resource`] of that type. It holds the collection path, the ordered
//! field names, the nested child types, and the [`RestClient`] bound to the
//! shared [`ClientConfig`].
//!
//! # Operations
//!
//! | Operation | Request |
//! |-----------|---------|
//! | [`index`](ResourceDescriptor::index) | `GET /<path>.json?<params>` |
//! | [`show`](ResourceDescriptor::show) | `GET /<path>/<id>.json?<params>` |
//! | [`create`](ResourceDescriptor::create) | `POST /<path>.json` with `{"<name>": content}` |
//! | [`update`](ResourceDescriptor::update) | `PUT /<path>/<id>.json` with `{"<name>": content}` |
//! | [`delete`](ResourceDescriptor::delete) | `DELETE /<path>/<id>.json` (opt-in) |
//! | [`index_all`](ResourceDescriptor::index_all) | paginated `GET /<path>.json?limit=..&offset=..` |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tiny_client::{BaseUrl, ClientConfig, ResourceDescriptor};
//!
//! let config = Arc::new(
//!     ClientConfig::builder()
//!         .url(BaseUrl::new("http://localhost:3000/api").unwrap())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let comment = ResourceDescriptor::builder("Comment")
//!     .fields(["id", "body"])
//!     .build(&config);
//!
//! let post = ResourceDescriptor::builder("Post")
//!     .path("posts")
//!     .fields(["id", "name", "content"])
//!     .nested([&comment])
//!     .deletable(true)
//!     .build(&config);
//!
//! assert_eq!(post.name(), "post");
//! assert_eq!(comment.path(), "comment");
//! assert!(post.nested_child("comment").is_some());
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::clients::{HttpMethod, HttpResponse, RestClient};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::rest::pagination::{Items, Pages};
use crate::rest::response::{Payload, Records};
use crate::rest::{Params, Resource, ResourceId};

/// The immutable declaration of a resource type.
///
/// Shared behind an `Arc`. Equality compares the declaration (name, path
/// and fields), not the configuration.
pub struct ResourceDescriptor {
    type_name: String,
    name: String,
    path: String,
    fields: Vec<String>,
    nested: Vec<Arc<ResourceDescriptor>>,
    deletable: bool,
    client: RestClient,
    last_response: Mutex<Option<HttpResponse>>,
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nested: Vec<&str> = self.nested.iter().map(|child| child.name()).collect();
        f.debug_struct("ResourceDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("fields", &self.fields)
            .field("nested", &nested)
            .field("deletable", &self.deletable)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ResourceDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.path == other.path && self.fields == other.fields
    }
}

impl Eq for ResourceDescriptor {}

// Verify ResourceDescriptor is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceDescriptor>();
};

impl ResourceDescriptor {
    /// Starts declaring a resource type.
    ///
    /// The singular name is the lowercased type name, without any module
    /// prefix (`"blog::Post"` becomes `"post"`).
    #[must_use]
    pub fn builder(type_name: impl Into<String>) -> ResourceDescriptorBuilder {
        ResourceDescriptorBuilder::new(type_name)
    }

    /// Returns the type name as declared.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the lowercase singular name used to wrap request bodies.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the declared field names, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns `true` if `field` is declared.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Returns the nested child types.
    #[must_use]
    pub fn nested(&self) -> &[Arc<Self>] {
        &self.nested
    }

    /// Returns the nested child type with the given singular name.
    #[must_use]
    pub fn nested_child(&self, name: &str) -> Option<&Arc<Self>> {
        self.nested.iter().find(|child| child.name == name)
    }

    /// Returns `true` if `child` is one of the declared nested types.
    #[must_use]
    pub fn declares_child(&self, child: &Self) -> bool {
        self.nested.iter().any(|c| c.as_ref() == child)
    }

    /// Returns `true` if [`delete`](Self::delete) is provided.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        self.deletable
    }

    /// Returns the shared configuration.
    #[must_use]
    pub const fn config(&self) -> &Arc<ClientConfig> {
        self.client.config()
    }

    /// Returns the most recent response received for this type.
    ///
    /// Responses are recorded on the type the payload was materialized as,
    /// so a nested listing records on the child type.
    #[must_use]
    pub fn last_response(&self) -> Option<HttpResponse> {
        self.last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record_response(&self, response: &HttpResponse) {
        *self
            .last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(response.clone());
    }

    /// Creates a new, unsaved instance of this type.
    #[must_use]
    pub fn instantiate(self: &Arc<Self>) -> Resource {
        Resource::new(self)
    }

    /// Performs one request against `/<path>/<id>/<name>.json` and
    /// materializes the body as `target` (this type when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Response`], [`Error::Transport`], [`Error::Decode`],
    /// or [`Error::Argument`] for a body that cannot be encoded.
    pub async fn request(
        self: &Arc<Self>,
        method: HttpMethod,
        id: Option<&ResourceId>,
        name: Option<&str>,
        params: &Params,
        body: Option<&Value>,
        target: Option<&Arc<Self>>,
    ) -> Result<Payload> {
        let target = target.unwrap_or(self);
        let id = id.map(ToString::to_string);

        let result = self
            .client
            .request(method, &self.path, id.as_deref(), name, params, body)
            .await;

        let response = match result {
            Ok(response) => response,
            Err(Error::Response(error)) => {
                target.record_response(&error.response);
                return Err(Error::Response(error));
            }
            Err(error) => return Err(error),
        };

        target.record_response(&response);
        Ok(Payload::from_response(&response, target)?)
    }

    /// `GET /<path>/<id>/<name>.json?<params>`
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(
        self: &Arc<Self>,
        id: Option<&ResourceId>,
        name: Option<&str>,
        params: &Params,
        target: Option<&Arc<Self>>,
    ) -> Result<Payload> {
        self.request(HttpMethod::Get, id, name, params, None, target)
            .await
    }

    /// `POST /<path>/<id>/<name>.json` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(
        self: &Arc<Self>,
        id: Option<&ResourceId>,
        name: Option<&str>,
        data: &Value,
        target: Option<&Arc<Self>>,
    ) -> Result<Payload> {
        self.request(HttpMethod::Post, id, name, &Params::new(), Some(data), target)
            .await
    }

    /// `PUT /<path>/<id>/<name>.json` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(
        self: &Arc<Self>,
        id: Option<&ResourceId>,
        name: Option<&str>,
        data: &Value,
        target: Option<&Arc<Self>>,
    ) -> Result<Payload> {
        self.request(HttpMethod::Put, id, name, &Params::new(), Some(data), target)
            .await
    }

    /// `DELETE /<path>/<id>/<name>.json`
    ///
    /// Unlike [`delete`](Self::delete), this primitive is always available.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete_at(
        self: &Arc<Self>,
        id: Option<&ResourceId>,
        name: Option<&str>,
        target: Option<&Arc<Self>>,
    ) -> Result<Payload> {
        self.request(HttpMethod::Delete, id, name, &Params::new(), None, target)
            .await
    }

    /// Lists the collection: `GET /<path>.json?<params>`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn index(self: &Arc<Self>, params: &Params) -> Result<Records> {
        Ok(self.get(None, None, params, None).await?.into_records())
    }

    /// Fetches one member: `GET /<path>/<id>.json?<params>`.
    ///
    /// Returns `None` when the server answers with an empty body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn show(
        self: &Arc<Self>,
        id: impl Into<ResourceId> + Send,
        params: &Params,
    ) -> Result<Option<Resource>> {
        let id = id.into();
        Ok(self.get(Some(&id), None, params, None).await?.into_resource())
    }

    /// Creates a member: `POST /<path>.json` with `{"<name>": content}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `content` cannot be serialized (before
    /// any request), otherwise see [`request`](Self::request).
    pub async fn create(self: &Arc<Self>, content: impl Serialize + Send) -> Result<Option<Resource>> {
        let data = self.wrap(&content)?;
        Ok(self.post(None, None, &data, None).await?.into_resource())
    }

    /// Updates a member: `PUT /<path>/<id>.json` with `{"<name>": content}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `content` cannot be serialized (before
    /// any request), otherwise see [`request`](Self::request).
    pub async fn update(
        self: &Arc<Self>,
        id: impl Into<ResourceId> + Send,
        content: impl Serialize + Send,
    ) -> Result<Option<Resource>> {
        let id = id.into();
        let data = self.wrap(&content)?;
        Ok(self.put(Some(&id), None, &data, None).await?.into_resource())
    }

    /// Deletes a member: `DELETE /<path>/<id>.json`.
    ///
    /// Only available on types declared with
    /// [`deletable(true)`](ResourceDescriptorBuilder::deletable).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] for other types (before any
    /// request), otherwise see [`request`](Self::request).
    pub async fn delete(self: &Arc<Self>, id: impl Into<ResourceId> + Send) -> Result<Option<Resource>> {
        if !self.deletable {
            return Err(Error::NotImplemented {
                resource: self.name.clone(),
                operation: "delete",
            });
        }
        let id = id.into();
        Ok(self.delete_at(Some(&id), None, None).await?.into_resource())
    }

    /// Walks the whole collection one resource at a time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `limit` or `offset` is invalid.
    pub fn index_all(self: &Arc<Self>, params: &Params) -> Result<Items> {
        self.get_all(None, None, params, None)
    }

    /// Walks the whole collection one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `limit` or `offset` is invalid.
    pub fn index_in_batches(self: &Arc<Self>, params: &Params) -> Result<Pages> {
        self.get_in_batches(None, None, params, None)
    }

    /// Paginated `GET /<path>/<id>/<name>.json`, one resource at a time.
    ///
    /// Nothing is requested until the first item is pulled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `limit` or `offset` is invalid.
    pub fn get_all(
        self: &Arc<Self>,
        id: Option<&ResourceId>,
        name: Option<&str>,
        params: &Params,
        target: Option<&Arc<Self>>,
    ) -> Result<Items> {
        Ok(self.get_in_batches(id, name, params, target)?.into_items())
    }

    /// Paginated `GET /<path>/<id>/<name>.json`, one page at a time.
    ///
    /// Nothing is requested until the first page is pulled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `limit` or `offset` is invalid.
    pub fn get_in_batches(
        self: &Arc<Self>,
        id: Option<&ResourceId>,
        name: Option<&str>,
        params: &Params,
        target: Option<&Arc<Self>>,
    ) -> Result<Pages> {
        Pages::new(
            Arc::clone(self),
            Arc::clone(target.unwrap_or(self)),
            id.cloned(),
            name.map(ToString::to_string),
            params.clone(),
        )
    }

    fn wrap(&self, content: &impl Serialize) -> Result<Value> {
        let value = serde_json::to_value(content).map_err(|e| {
            Error::argument(format!("Cannot encode {} content as JSON: {e}", self.name))
        })?;
        let mut body = Params::new();
        body.insert(self.name.clone(), value);
        Ok(Value::Object(body))
    }
}

/// Builder for [`ResourceDescriptor`] instances.
///
/// `path`, `fields` and `nested` are write-once: the first call wins and
/// later calls are ignored.
///
/// # Defaults
///
/// - `path`: the singular name
/// - `fields`: none
/// - `nested`: none
/// - `deletable`: `false`
#[derive(Debug)]
pub struct ResourceDescriptorBuilder {
    type_name: String,
    path: Option<String>,
    fields: Option<Vec<String>>,
    nested: Option<Vec<Arc<ResourceDescriptor>>>,
    deletable: bool,
}

impl ResourceDescriptorBuilder {
    fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            path: None,
            fields: None,
            nested: None,
            deletable: false,
        }
    }

    /// Sets the collection path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        if self.path.is_some() {
            tracing::debug!(resource = %self.type_name, "path already declared, ignoring");
        } else {
            self.path = Some(path.into());
        }
        self
    }

    /// Declares the field names. Duplicates keep their first position.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.fields.is_some() {
            tracing::debug!(resource = %self.type_name, "fields already declared, ignoring");
            return self;
        }

        let mut declared: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !declared.contains(&field) {
                declared.push(field);
            }
        }
        self.fields = Some(declared);
        self
    }

    /// Declares the nested child types.
    #[must_use]
    pub fn nested<'a, I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = &'a Arc<ResourceDescriptor>>,
    {
        if self.nested.is_some() {
            tracing::debug!(resource = %self.type_name, "nested resources already declared, ignoring");
        } else {
            self.nested = Some(children.into_iter().map(Arc::clone).collect());
        }
        self
    }

    /// Provides the class-level [`delete`](ResourceDescriptor::delete).
    #[must_use]
    pub const fn deletable(mut self, deletable: bool) -> Self {
        self.deletable = deletable;
        self
    }

    /// Builds the descriptor bound to `config`.
    #[must_use]
    pub fn build(self, config: &Arc<ClientConfig>) -> Arc<ResourceDescriptor> {
        let name = self
            .type_name
            .rsplit("::")
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let path = self.path.unwrap_or_else(|| name.clone());

        Arc::new(ResourceDescriptor {
            type_name: self.type_name,
            name,
            path,
            fields: self.fields.unwrap_or_default(),
            nested: self.nested.unwrap_or_default(),
            deletable: self.deletable,
            client: RestClient::new(Arc::clone(config)),
            last_response: Mutex::new(None),
        })
    }
}

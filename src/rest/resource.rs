//! Resource instances: field access, change tracking and the save/load/destroy
//! lifecycle.
//!
//! A [`Resource`] holds exactly one value per field declared on its
//! [`ResourceDescriptor`]. Unset fields hold `null`. Every write through
//! [`Resource::set`] is recorded, and only recorded fields are sent by
//! [`Resource::save`].
//!
//! # Lifecycle
//!
//! | State | `id()` | `save()` |
//! |-------|--------|----------|
//! | new | `None` | `POST /<path>.json` |
//! | persisted | `Some(..)` | `PUT /<path>/<id>.json` |
//!
//! After [`destroy`](Resource::destroy) the instance is logically gone but
//! its fields stay readable.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use tiny_client::{ClientConfig, ResourceDescriptor};
//!
//! let config = Arc::new(ClientConfig::builder().build().unwrap());
//! let post = ResourceDescriptor::builder("Post")
//!     .path("posts")
//!     .fields(["id", "name", "content"])
//!     .build(&config);
//!
//! let mut draft = post.instantiate();
//! assert!(draft.is_new());
//!
//! draft.set("name", "toto").unwrap();
//! assert_eq!(draft.changed_fields(), ["name"]);
//! assert_eq!(draft.to_json(true), r#"{"post":{"name":"toto"}}"#);
//!
//! // Undeclared fields are rejected
//! assert!(draft.set("author", "me").is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::clients::DecodeError;
use crate::error::{Error, Result};
use crate::rest::{ChangeSet, Params, ResourceDescriptor, ResourceId};

/// One instance of a declared resource type.
#[derive(Clone)]
pub struct Resource {
    descriptor: Arc<ResourceDescriptor>,
    id: Option<ResourceId>,
    values: Params,
    changes: ChangeSet,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("resource", &self.descriptor.name())
            .field("id", &self.id)
            .field("values", &self.values)
            .field("changes", &self.changes)
            .finish()
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor && self.id == other.id && self.values == other.values
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

impl Resource {
    /// Creates a new, unsaved instance with every field unset.
    #[must_use]
    pub fn new(descriptor: &Arc<ResourceDescriptor>) -> Self {
        let values = descriptor
            .fields()
            .iter()
            .map(|field| (field.clone(), Value::Null))
            .collect();

        Self {
            descriptor: Arc::clone(descriptor),
            id: None,
            values,
            changes: ChangeSet::new(),
        }
    }

    /// Materializes an instance from a decoded JSON object.
    ///
    /// Declared fields are read from matching keys; other keys are ignored.
    /// The id is read from the `id` key whether or not `id` is a declared
    /// field. The instance has no pending changes.
    #[must_use]
    pub fn build(descriptor: &Arc<ResourceDescriptor>, object: &Value) -> Self {
        let mut resource = Self::new(descriptor);
        resource.id = object.get("id").and_then(ResourceId::from_value);
        for (field, value) in &mut resource.values {
            if let Some(source) = object.get(field.as_str()) {
                value.clone_from(source);
            }
        }
        resource
    }

    /// Returns the type of this instance.
    #[must_use]
    pub const fn descriptor(&self) -> &Arc<ResourceDescriptor> {
        &self.descriptor
    }

    /// Returns the id, if the instance is persisted.
    #[must_use]
    pub const fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    /// Sets the id.
    ///
    /// When `id` is a declared field it is updated and recorded as changed.
    pub fn set_id(&mut self, id: impl Into<ResourceId>) {
        let id = id.into();
        if let Some(value) = self.values.get_mut("id") {
            *value = id.to_value();
            self.changes.touch("id");
        }
        self.id = Some(id);
    }

    /// Returns `true` if the instance has no id.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns `true` if the instance has an id.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the value of a declared field, `None` for undeclared names.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Writes a declared field and records it as changed.
    ///
    /// The field is recorded even when `value` equals the current value.
    /// Writing `id` also updates [`id`](Self::id).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `field` is not declared.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let Some(slot) = self.values.get_mut(field) else {
            return Err(Error::argument(format!(
                "{} has no field named '{field}'",
                self.descriptor.name()
            )));
        };

        *slot = value.into();
        if field == "id" {
            self.id = ResourceId::from_value(slot);
        }
        self.changes.touch(field);
        Ok(())
    }

    /// Returns the names of the fields written since the last sync, in
    /// declaration order.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&str> {
        self.changes.ordered(self.descriptor.fields())
    }

    /// Returns `true` if any field was written since the last sync.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.changes.is_dirty()
    }

    /// Returns the written fields with their current values.
    #[must_use]
    pub fn changes(&self) -> Params {
        self.changes.payload(self.descriptor.fields(), &self.values)
    }

    /// Returns the fields holding a value (non-null), in declaration order.
    #[must_use]
    pub fn to_map(&self) -> Params {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// Returns every declared field, unset ones as `null`.
    #[must_use]
    pub fn as_json(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Renders the non-null fields as JSON, wrapped under the singular name
    /// when `prefixed`.
    #[must_use]
    pub fn to_json(&self, prefixed: bool) -> String {
        let fields = Value::Object(self.to_map());
        let value = if prefixed {
            let mut wrapped = Params::new();
            wrapped.insert(self.descriptor.name().to_string(), fields);
            Value::Object(wrapped)
        } else {
            fields
        };
        value.to_string()
    }

    /// Deserializes every declared field into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the fields do not match `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.as_json()).map_err(|e| Error::Decode(DecodeError::Json(e)))
    }

    /// Creates or updates this instance on the server.
    ///
    /// Only the changed fields are sent. On success the returned id and
    /// non-null fields are adopted and the change set is cleared. On failure
    /// the instance is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Response`], [`Error::Transport`] or [`Error::Decode`].
    pub async fn save(&mut self) -> Result<()> {
        let data = Value::Object(self.changes());
        let saved = match &self.id {
            Some(id) => self.descriptor.update(id, &data).await?,
            None => self.descriptor.create(&data).await?,
        };

        if let Some(saved) = saved {
            self.adopt(&saved);
        }
        self.changes.mark_clean();
        Ok(())
    }

    /// Reloads every field from `GET /<path>/<id>.json?<params>`.
    ///
    /// Fields absent from the response become `null`; a declared `id` field
    /// always mirrors [`id`](Self::id). The change set is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingId`] for a new instance (before any request),
    /// otherwise [`Error::Response`], [`Error::Transport`] or
    /// [`Error::Decode`].
    pub async fn load(&mut self, params: &Params) -> Result<()> {
        let id = self.require_id("load")?.clone();
        if let Some(reloaded) = self.descriptor.show(&id, params).await? {
            if reloaded.id.is_some() {
                self.id = reloaded.id;
            }
            self.values = reloaded.values;
            if let (Some(id), Some(slot)) = (&self.id, self.values.get_mut("id")) {
                *slot = id.to_value();
            }
        }
        self.changes.mark_clean();
        Ok(())
    }

    /// Deletes this instance on the server: `DELETE /<path>/<id>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingId`] for a new instance and
    /// [`Error::NotImplemented`] for types that are not deletable (both before
    /// any request), otherwise [`Error::Response`] or [`Error::Transport`].
    pub async fn destroy(&self) -> Result<()> {
        let id = self.require_id("destroy")?;
        self.descriptor.delete(id).await?;
        Ok(())
    }

    pub(crate) fn require_id(&self, operation: &'static str) -> Result<&ResourceId> {
        self.id.as_ref().ok_or_else(|| Error::MissingId {
            resource: self.descriptor.name().to_string(),
            operation,
        })
    }

    fn adopt(&mut self, saved: &Self) {
        if let Some(id) = &saved.id {
            self.id = Some(id.clone());
        }
        for (field, value) in &saved.values {
            if value.is_null() {
                continue;
            }
            if let Some(slot) = self.values.get_mut(field) {
                slot.clone_from(value);
            }
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

//! Nested resources: child collections scoped under a persisted parent.
//!
//! For a parent `post` with id `1` and a child type `comment` at path
//! `comments`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | [`nested_index`](Resource::nested_index) | `GET /posts/1/comments.json` |
//! | [`nested_show`](Resource::nested_show) | `GET /posts/1/comments/<cid>.json` |
//! | [`nested_create`](Resource::nested_create) | `POST /posts/1/comments.json` with `{"comment": changes}` |
//! | [`nested_update`](Resource::nested_update) | `PUT /posts/1/comments/<cid>.json` with `{"comment": changes}` |
//! | [`nested_delete`](Resource::nested_delete) | `DELETE /posts/1/comments/<cid>.json` |
//! | [`nested_all`](Resource::nested_all) | paginated `GET /posts/1/comments.json` |
//!
//! Every operation checks, before sending anything, that the child type is
//! declared on the parent ([`Error::Argument`] otherwise) and that the parent
//! has an id ([`Error::MissingId`] otherwise).

use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::rest::{Items, Pages, Params, Records, Resource, ResourceDescriptor, ResourceId};

impl Resource {
    /// Lists the children: `GET /<path>/<id>/<child path>.json?<params>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] or [`Error::MissingId`] (before any
    /// request), otherwise [`Error::Response`], [`Error::Transport`] or
    /// [`Error::Decode`].
    pub async fn nested_index(
        &self,
        child: &Arc<ResourceDescriptor>,
        params: &Params,
    ) -> Result<Records> {
        let id = self.nested_parent_id(child, "nested_index")?;
        let payload = self
            .descriptor()
            .get(Some(id), Some(child.path()), params, Some(child))
            .await?;
        Ok(payload.into_records())
    }

    /// Fetches one child: `GET /<path>/<id>/<child path>/<cid>.json?<params>`.
    ///
    /// # Errors
    ///
    /// See [`nested_index`](Self::nested_index).
    pub async fn nested_show(
        &self,
        child: &Arc<ResourceDescriptor>,
        child_id: impl Into<ResourceId> + Send,
        params: &Params,
    ) -> Result<Option<Resource>> {
        let id = self.nested_parent_id(child, "nested_show")?;
        let name = member_path(child, &child_id.into());
        let payload = self
            .descriptor()
            .get(Some(id), Some(name.as_str()), params, Some(child))
            .await?;
        Ok(payload.into_resource())
    }

    /// Creates `resource` under this parent, sending its changed fields.
    ///
    /// # Errors
    ///
    /// See [`nested_index`](Self::nested_index).
    pub async fn nested_create(&self, resource: &Resource) -> Result<Option<Resource>> {
        let child = resource.descriptor();
        let id = self.nested_parent_id(child, "nested_create")?;
        let data = wrap_changes(resource);
        let payload = self
            .descriptor()
            .post(Some(id), Some(child.path()), &data, Some(child))
            .await?;
        Ok(payload.into_resource())
    }

    /// Updates `resource` under this parent, sending its changed fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `resource` has no id, otherwise see
    /// [`nested_index`](Self::nested_index).
    pub async fn nested_update(&self, resource: &Resource) -> Result<Option<Resource>> {
        let child = resource.descriptor();
        let id = self.nested_parent_id(child, "nested_update")?;
        let name = member_path(child, child_id(resource)?);
        let data = wrap_changes(resource);
        let payload = self
            .descriptor()
            .put(Some(id), Some(name.as_str()), &data, Some(child))
            .await?;
        Ok(payload.into_resource())
    }

    /// Deletes `resource` under this parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `resource` has no id, otherwise see
    /// [`nested_index`](Self::nested_index).
    pub async fn nested_delete(&self, resource: &Resource) -> Result<Option<Resource>> {
        let child = resource.descriptor();
        let id = self.nested_parent_id(child, "nested_delete")?;
        let name = member_path(child, child_id(resource)?);
        let payload = self
            .descriptor()
            .delete_at(Some(id), Some(name.as_str()), Some(child))
            .await?;
        Ok(payload.into_resource())
    }

    /// Walks every child one resource at a time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] or [`Error::MissingId`]. Request errors
    /// surface while pulling items.
    pub fn nested_all(&self, child: &Arc<ResourceDescriptor>, params: &Params) -> Result<Items> {
        Ok(self.nested_in_batches(child, params)?.into_items())
    }

    /// Walks every child one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] or [`Error::MissingId`]. Request errors
    /// surface while pulling pages.
    pub fn nested_in_batches(
        &self,
        child: &Arc<ResourceDescriptor>,
        params: &Params,
    ) -> Result<Pages> {
        let id = self.nested_parent_id(child, "nested_all")?;
        self.descriptor()
            .get_in_batches(Some(id), Some(child.path()), params, Some(child))
    }

    fn nested_parent_id(
        &self,
        child: &ResourceDescriptor,
        operation: &'static str,
    ) -> Result<&ResourceId> {
        if !self.descriptor().declares_child(child) {
            return Err(Error::argument(format!(
                "{} is not a nested resource of {}",
                child.name(),
                self.descriptor().name()
            )));
        }
        self.require_id(operation)
    }
}

fn child_id(resource: &Resource) -> Result<&ResourceId> {
    resource.id().ok_or_else(|| {
        Error::argument(format!(
            "{} must have an id set",
            resource.descriptor().name()
        ))
    })
}

fn member_path(child: &ResourceDescriptor, id: &ResourceId) -> String {
    format!("{}/{id}", child.path())
}

fn wrap_changes(resource: &Resource) -> Value {
    let mut data = Params::new();
    data.insert(
        resource.descriptor().name().to_string(),
        Value::Object(resource.changes()),
    );
    Value::Object(data)
}

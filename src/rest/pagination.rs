//! Limit/offset pagination.
//!
//! [`Pages`] walks a collection one page at a time, [`Items`] one resource
//! at a time. Both are pull-driven: a request is sent only when the caller
//! asks for the next page (or runs out of items on the current one), and
//! pages are fetched strictly in increasing offset order.
//!
//! # Algorithm
//!
//! - `limit` comes from the `limit` parameter, else the configured default,
//!   else [`DEFAULT_PAGE_LIMIT`]
//! - `offset` comes from the `offset` parameter, else 0
//! - every request carries both; `offset` advances by `limit` afterwards
//! - a page whose size differs from `limit` is the last one
//!
//! A collection whose size is an exact multiple of `limit` therefore costs
//! one extra request, answered by an empty page. Empty pages are never
//! yielded.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut pages = post.index_in_batches(&Params::new())?;
//! while let Some(page) = pages.next_page().await? {
//!     for resource in page {
//!         println!("{:?}", resource.get("name"));
//!     }
//! }
//!
//! let all = post.index_all(&Params::new())?.collect_all().await?;
//! ```

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, Stream};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::rest::{Params, Records, Resource, ResourceDescriptor, ResourceId};

/// Page size used when neither the call nor the configuration sets one.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// A lazy, forward-only sequence of pages.
///
/// Once [`next_page`](Self::next_page) returns `Ok(None)` or an error, the
/// sequence is exhausted and sends no further requests.
pub struct Pages {
    descriptor: Arc<ResourceDescriptor>,
    target: Arc<ResourceDescriptor>,
    id: Option<ResourceId>,
    name: Option<String>,
    params: Params,
    limit: u64,
    offset: u64,
    done: bool,
}

impl fmt::Debug for Pages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pages")
            .field("resource", &self.descriptor.name())
            .field("target", &self.target.name())
            .field("id", &self.id)
            .field("name", &self.name)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl Pages {
    /// Prepares a paginated `GET /<path>/<id>/<name>.json` materialized as
    /// `target`. Nothing is requested yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `limit` is 0 or not a non-negative
    /// integer, or if `offset` is not a non-negative integer.
    pub fn new(
        descriptor: Arc<ResourceDescriptor>,
        target: Arc<ResourceDescriptor>,
        id: Option<ResourceId>,
        name: Option<String>,
        params: Params,
    ) -> Result<Self> {
        let limit = match read_count(&params, "limit")? {
            Some(limit) => limit,
            None => descriptor
                .config()
                .limit()
                .map_or(DEFAULT_PAGE_LIMIT, u64::from),
        };
        if limit == 0 {
            return Err(Error::argument("Pagination limit must be at least 1"));
        }
        let offset = read_count(&params, "offset")?.unwrap_or(0);

        Ok(Self {
            descriptor,
            target,
            id,
            name,
            params,
            limit,
            offset,
            done: false,
        })
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the offset of the next page to fetch.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns `false` once the last page has been fetched.
    ///
    /// A `true` result does not guarantee the next page is non-empty.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        !self.done
    }

    /// Fetches the next page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Response`], [`Error::Transport`] or [`Error::Decode`]
    /// from the page request. The sequence ends after an error.
    pub async fn next_page(&mut self) -> Result<Option<Records>> {
        if self.done {
            return Ok(None);
        }

        let mut params = self.params.clone();
        params.insert("limit".to_string(), Value::from(self.limit));
        params.insert("offset".to_string(), Value::from(self.offset));

        let result = self
            .descriptor
            .get(
                self.id.as_ref(),
                self.name.as_deref(),
                &params,
                Some(&self.target),
            )
            .await;

        let records = match result {
            Ok(payload) => payload.into_records(),
            Err(error) => {
                self.done = true;
                return Err(error);
            }
        };

        let size = u64::try_from(records.len()).unwrap_or(u64::MAX);
        tracing::trace!(
            resource = %self.target.name(),
            offset = self.offset,
            limit = self.limit,
            size,
            "fetched page"
        );

        self.offset = self.offset.saturating_add(self.limit);
        if size != self.limit {
            self.done = true;
        }

        if size == 0 {
            return Ok(None);
        }
        Ok(Some(records))
    }

    /// Flattens the pages into a sequence of resources.
    #[must_use]
    pub fn into_items(self) -> Items {
        Items {
            pages: self,
            current: None,
        }
    }

    /// Converts the pages into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<Records>> {
        stream::try_unfold(self, |mut pages| async move {
            let page = pages.next_page().await?;
            Ok::<_, Error>(page.map(|page| (page, pages)))
        })
    }
}

/// A lazy, forward-only sequence of resources spanning every page.
#[derive(Debug)]
pub struct Items {
    pages: Pages,
    current: Option<Records>,
}

impl Items {
    /// Returns the underlying page cursor.
    #[must_use]
    pub const fn pages(&self) -> &Pages {
        &self.pages
    }

    /// Returns the next resource, fetching the next page when the current
    /// one is used up.
    ///
    /// # Errors
    ///
    /// See [`Pages::next_page`].
    pub async fn next_item(&mut self) -> Result<Option<Resource>> {
        loop {
            if let Some(records) = self.current.as_mut() {
                if let Some(resource) = records.next() {
                    return Ok(Some(resource));
                }
                self.current = None;
            }

            match self.pages.next_page().await? {
                Some(page) => self.current = Some(page),
                None => return Ok(None),
            }
        }
    }

    /// Pulls every remaining resource.
    ///
    /// # Errors
    ///
    /// See [`Pages::next_page`]. Resources pulled before the error are lost.
    pub async fn collect_all(mut self) -> Result<Vec<Resource>> {
        let mut all = Vec::new();
        while let Some(resource) = self.next_item().await? {
            all.push(resource);
        }
        Ok(all)
    }

    /// Converts the items into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<Resource>> {
        stream::try_unfold(self, |mut items| async move {
            let item = items.next_item().await?;
            Ok::<_, Error>(item.map(|item| (item, items)))
        })
    }
}

// Verify the cursors are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Pages>();
    assert_send_sync::<Items>();
};

fn read_count(params: &Params, key: &str) -> Result<Option<u64>> {
    let invalid = |value: &Value| {
        Error::argument(format!(
            "Pagination {key} must be a non-negative integer, got {value}"
        ))
    };

    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| invalid(value)),
        Some(value @ Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid(value)),
        Some(other) => Err(invalid(other)),
    }
}

//! Materializing decoded response bodies into resources.
//!
//! A decoded body becomes a [`Payload`]:
//!
//! - a JSON object becomes [`Payload::One`]
//! - a JSON array becomes [`Payload::Many`], a lazy [`Records`] sequence
//! - an empty body becomes [`Payload::Empty`] (e.g. a 204 after DELETE)
//!
//! Bodies wrapped in an envelope are unwrapped first: `{"post": {...}}` for a
//! resource named `post`, and `{"posts": [...]}` for a collection at path
//! `posts`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tiny_client::{ClientConfig, HttpResponse, Payload, ResourceDescriptor};
//!
//! let config = Arc::new(ClientConfig::builder().build().unwrap());
//! let post = ResourceDescriptor::builder("Post")
//!     .path("posts")
//!     .fields(["id", "name"])
//!     .build(&config);
//!
//! let response = HttpResponse::from_raw(
//!     200,
//!     "/posts.json",
//!     "",
//!     r#"[{"id":1,"name":"a"},{"id":2,"name":"b"}]"#,
//! );
//! let records = Payload::from_response(&response, &post).unwrap().into_records();
//! let names: Vec<_> = records.map(|r| r.get("name").cloned().unwrap()).collect();
//! assert_eq!(names, ["a", "b"]);
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{DecodeError, HttpResponse};
use crate::rest::{Resource, ResourceDescriptor};

/// The materialized result of one request.
#[derive(Debug)]
pub enum Payload {
    /// An object body.
    One(Resource),
    /// An array body.
    Many(Records),
    /// An empty body.
    Empty,
}

impl Payload {
    /// Decodes a response body and materializes it as `descriptor`.
    ///
    /// Scalar bodies (a bare string or number) carry no resource and are
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is present but cannot be decoded.
    pub fn from_response(
        response: &HttpResponse,
        descriptor: &Arc<ResourceDescriptor>,
    ) -> Result<Self, DecodeError> {
        let Some(body) = response.decode_body()? else {
            return Ok(Self::Empty);
        };
        Ok(Self::from_value(body, descriptor))
    }

    /// Materializes an already decoded body as `descriptor`.
    #[must_use]
    pub fn from_value(body: Value, descriptor: &Arc<ResourceDescriptor>) -> Self {
        match unwrap_envelope(body, descriptor) {
            Value::Object(object) => {
                Self::One(Resource::build(descriptor, &Value::Object(object)))
            }
            Value::Array(items) => Self::Many(Records::new(Arc::clone(descriptor), items)),
            Value::Null => Self::Empty,
            other => {
                tracing::debug!(
                    resource = %descriptor.name(),
                    body = %other,
                    "scalar response body ignored"
                );
                Self::Empty
            }
        }
    }

    /// Returns `true` for [`Payload::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the single resource.
    ///
    /// An array body yields its first element.
    #[must_use]
    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Self::One(resource) => Some(resource),
            Self::Many(mut records) => records.next(),
            Self::Empty => None,
        }
    }

    /// Returns the payload as a sequence.
    ///
    /// An object body becomes a sequence of one; an empty body an empty
    /// sequence.
    #[must_use]
    pub fn into_records(self) -> Records {
        match self {
            Self::One(resource) => Records::single(resource),
            Self::Many(records) => records,
            Self::Empty => Records::empty(),
        }
    }
}

/// A lazy, one-shot sequence of resources decoded from an array body.
///
/// Each element is materialized when it is pulled.
pub struct Records {
    descriptor: Option<Arc<ResourceDescriptor>>,
    ready: Option<Resource>,
    items: std::vec::IntoIter<Value>,
}

impl Records {
    fn new(descriptor: Arc<ResourceDescriptor>, items: Vec<Value>) -> Self {
        Self {
            descriptor: Some(descriptor),
            ready: None,
            items: items.into_iter(),
        }
    }

    fn single(resource: Resource) -> Self {
        Self {
            descriptor: Some(Arc::clone(resource.descriptor())),
            ready: Some(resource),
            items: Vec::new().into_iter(),
        }
    }

    /// Returns an empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            descriptor: None,
            ready: None,
            items: Vec::new().into_iter(),
        }
    }

    /// Returns the type the elements are materialized as.
    #[must_use]
    pub const fn descriptor(&self) -> Option<&Arc<ResourceDescriptor>> {
        self.descriptor.as_ref()
    }
}

impl fmt::Debug for Records {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records")
            .field(
                "resource",
                &self.descriptor.as_ref().map(|d| d.name().to_string()),
            )
            .field("remaining", &self.len())
            .finish()
    }
}

impl Iterator for Records {
    type Item = Resource;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(resource) = self.ready.take() {
            return Some(resource);
        }
        let descriptor = self.descriptor.as_ref()?;
        self.items
            .next()
            .map(|value| Resource::build(descriptor, &value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.descriptor.is_none() {
            return (0, Some(0));
        }
        let remaining = self.items.len() + usize::from(self.ready.is_some());
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Records {}

fn unwrap_envelope(body: Value, descriptor: &ResourceDescriptor) -> Value {
    let Value::Object(mut object) = body else {
        return body;
    };

    if object.len() == 1 {
        let single = object.get(descriptor.name()).is_some_and(Value::is_object);
        let collection = object.get(descriptor.path()).is_some_and(Value::is_array);

        if single {
            if let Some(inner) = object.remove(descriptor.name()) {
                return inner;
            }
        } else if collection {
            if let Some(inner) = object.remove(descriptor.path()) {
                return inner;
            }
        }
    }

    Value::Object(object)
}

// Verify Payload is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Payload>();
    assert_send_sync::<Records>();
};

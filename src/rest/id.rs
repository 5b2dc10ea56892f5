//! Resource identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The identifier of a persisted resource.
///
/// APIs use either numeric or textual ids; both render the same way in a
/// URL path segment.
///
/// ```rust
/// use tiny_client::ResourceId;
///
/// assert_eq!(ResourceId::from(42).to_string(), "42");
/// assert_eq!(ResourceId::from("a-b").to_string(), "a-b");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// A non-negative integer id.
    Number(u64),
    /// Any other id, kept as text.
    Text(String),
}

impl ResourceId {
    /// Reads an id from a decoded JSON value.
    ///
    /// `null` and empty strings are not ids.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(
                n.as_u64()
                    .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            ),
            other => Some(Self::Text(other.to_string())),
        }
    }

    /// Returns the id as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        Self::Number(u64::from(id))
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        u64::try_from(id).map_or_else(|_| Self::Text(id.to_string()), Self::Number)
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        Self::from(i64::from(id))
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &Self) -> Self {
        id.clone()
    }
}

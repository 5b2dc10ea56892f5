//! Change tracking for partial saves.
//!
//! A [`ChangeSet`] records which declared fields were written since the
//! resource was built, loaded or saved. It does not compare values: writing
//! a field with the value it already holds still marks it as changed.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tiny_client::rest::ChangeSet;
//!
//! let mut changes = ChangeSet::new();
//! assert!(!changes.is_dirty());
//!
//! changes.touch("title");
//! assert!(changes.contains("title"));
//!
//! let fields = vec!["id".to_string(), "title".to_string()];
//! let values = json!({ "id": 1, "title": "New" });
//! let payload = changes.payload(&fields, values.as_object().unwrap());
//! assert_eq!(serde_json::Value::Object(payload), json!({ "title": "New" }));
//!
//! changes.mark_clean();
//! assert!(!changes.is_dirty());
//! ```

use std::collections::BTreeSet;

use serde_json::Value;

use crate::rest::Params;

/// The set of field names written since the last sync with the server.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    touched: BTreeSet<String>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            touched: BTreeSet::new(),
        }
    }

    /// Records a write to `field`.
    pub fn touch(&mut self, field: impl Into<String>) {
        self.touched.insert(field.into());
    }

    /// Returns `true` if `field` was written.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Returns `true` if any field was written.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.touched.is_empty()
    }

    /// Returns the number of written fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.touched.len()
    }

    /// Returns `true` if no field was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Returns the written field names in `fields` order.
    #[must_use]
    pub fn ordered<'a>(&self, fields: &'a [String]) -> Vec<&'a str> {
        fields
            .iter()
            .filter(|field| self.touched.contains(field.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Returns the written fields with their current values, in `fields` order.
    ///
    /// Fields missing from `values` are sent as `null`.
    #[must_use]
    pub fn payload(&self, fields: &[String], values: &Params) -> Params {
        self.ordered(fields)
            .into_iter()
            .map(|field| {
                (
                    field.to_string(),
                    values.get(field).cloned().unwrap_or(Value::Null),
                )
            })
            .collect()
    }

    /// Forgets every recorded write.
    pub fn mark_clean(&mut self) {
        self.touched.clear();
    }
}

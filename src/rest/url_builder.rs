//! Request URL construction.
//!
//! A [`UrlBuilder`] accumulates a base URL, path segments and query
//! parameters, then renders them into one request URL:
//!
//! - the base URL loses a single trailing `/`; an empty base or `/` is the root
//! - every segment loses a trailing `.json` and surrounding `/`; empty
//!   segments are dropped, so the result never holds `//` in its path
//! - `.json` is appended after the last segment, before the query string
//! - query keys are sorted; arrays use `key[]=` and objects use `key[sub]=`
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tiny_client::UrlBuilder;
//!
//! let url = UrlBuilder::url("/organizations")
//!     .path(1)
//!     .path("roles/1.json")
//!     .path("permissions/1.json")
//!     .build();
//! assert_eq!(url, "/organizations/1/roles/1/permissions/1.json");
//!
//! let params = json!({ "offset": 0, "limit": 10 });
//! let url = UrlBuilder::url("http://acme.org")
//!     .path("my")
//!     .query(params.as_object().unwrap())
//!     .build();
//! assert_eq!(url, "http://acme.org/my.json?limit=10&offset=0");
//! ```

use std::fmt::Display;

use serde_json::Value;

/// Query parameters, and the key/value bag passed to resource operations.
pub type Params = serde_json::Map<String, Value>;

const SEPARATOR: char = '/';
const JSON_SUFFIX: &str = ".json";

/// Accumulate-then-build request URL builder.
///
/// [`build`](Self::build) does not consume the builder and returns the same
/// URL every time it is called on the same state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
    segments: Vec<String>,
    params: Params,
}

impl UrlBuilder {
    /// Starts a builder at the given base URL.
    #[must_use]
    pub fn url(base: impl AsRef<str>) -> Self {
        let base = base.as_ref();
        let base = base.strip_suffix(SEPARATOR).unwrap_or(base);

        Self {
            base: base.to_string(),
            segments: Vec::new(),
            params: Params::new(),
        }
    }

    /// Appends a path segment.
    ///
    /// A segment may hold several parts (`"permissions/1"`). Segments that
    /// normalize to nothing (`""`, `"/"`, `".json"`) are ignored.
    #[must_use]
    pub fn path(mut self, segment: impl Display) -> Self {
        let segment = segment.to_string();
        let segment = segment.strip_suffix(JSON_SUFFIX).unwrap_or(&segment);

        self.segments.extend(
            segment
                .split(SEPARATOR)
                .filter(|part| !part.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Appends a path segment when one is given.
    #[must_use]
    pub fn path_opt(self, segment: Option<impl Display>) -> Self {
        match segment {
            Some(segment) => self.path(segment),
            None => self,
        }
    }

    /// Merges query parameters; later values win per key.
    #[must_use]
    pub fn query(mut self, params: &Params) -> Self {
        for (key, value) in params {
            self.params.insert(key.clone(), value.clone());
        }
        self
    }

    /// Returns the path segments accumulated so far.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Renders the URL.
    #[must_use]
    pub fn build(&self) -> String {
        let mut url = format!(
            "{}{SEPARATOR}{}{JSON_SUFFIX}",
            self.base,
            self.segments.join("/")
        );

        let query = to_query(&self.params);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

/// Encodes parameters as a query string.
///
/// Keys are sorted. Arrays repeat `key[]`, objects nest as `key[sub]`,
/// `null` renders as `key=`. Empty arrays and objects are left out.
///
/// ```rust
/// use serde_json::json;
/// use tiny_client::rest::to_query;
///
/// let params = json!({ "q": { "name": "to to" }, "id": [1, 2] });
/// assert_eq!(
///     to_query(params.as_object().unwrap()),
///     "id%5B%5D=1&id%5B%5D=2&q%5Bname%5D=to%20to"
/// );
/// ```
#[must_use]
pub fn to_query(params: &Params) -> String {
    encode_object(params, None)
}

fn encode_object(map: &Params, prefix: Option<&str>) -> String {
    let mut parts: Vec<String> = map
        .iter()
        .filter(|(_, value)| !is_empty_collection(value))
        .map(|(key, value)| {
            let name = prefix.map_or_else(|| key.clone(), |p| format!("{p}[{key}]"));
            encode_value(value, &name)
        })
        .collect();
    parts.sort();
    parts.join("&")
}

fn encode_value(value: &Value, name: &str) -> String {
    match value {
        Value::Object(map) => encode_object(map, Some(name)),
        Value::Array(items) => {
            let name = format!("{name}[]");
            if items.is_empty() {
                return format!("{}=", urlencoding::encode(&name));
            }
            items
                .iter()
                .map(|item| encode_value(item, &name))
                .collect::<Vec<_>>()
                .join("&")
        }
        Value::Null => format!("{}=", urlencoding::encode(name)),
        Value::String(s) => format!("{}={}", urlencoding::encode(name), urlencoding::encode(s)),
        Value::Bool(_) | Value::Number(_) => format!(
            "{}={}",
            urlencoding::encode(name),
            urlencoding::encode(&value.to_string())
        ),
    }
}

fn is_empty_collection(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

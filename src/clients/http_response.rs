//! HTTP response type returned by a [`Requestor`](crate::Requestor).
//!
//! An [`HttpResponse`] holds the outcome of one HTTP call exactly as it was
//! received: status code, headers and undecoded body bytes. Decoding is
//! deferred to [`HttpResponse::decode_body`], which also takes care of
//! `Content-Encoding: gzip` payloads.
//!
//! # Example
//!
//! ```rust
//! use tiny_client::HttpResponse;
//!
//! let response = HttpResponse::from_raw(
//!     200,
//!     "http://api.test/posts.json",
//!     "Content-Type: application/json\r\nX-Total-Count: 28\r\n",
//!     r#"[{"id":1}]"#,
//! );
//!
//! assert!(response.is_success());
//! assert_eq!(response.total_count(), Some(28));
//! assert!(response.decode_body().unwrap().unwrap().is_array());
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;

use flate2::read::GzDecoder;
use serde_json::{json, Value};

use crate::clients::errors::DecodeError;

const TOTAL_COUNT_HEADER: &str = "x-total-count:";

/// The outcome of one HTTP call.
///
/// Header names are stored lowercased; a header may carry several values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The URL that was called.
    pub url: String,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The headers as a raw text block, one `Name: value` per line.
    pub raw_headers: String,
    /// The body exactly as received.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from already split headers.
    ///
    /// Header names are lowercased and a raw header block is synthesized
    /// from them.
    #[must_use]
    pub fn new(
        code: u16,
        url: impl Into<String>,
        headers: HashMap<String, Vec<String>>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::with_capacity(headers.len());
        for (name, values) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }

        let ordered: BTreeMap<_, _> = normalized.iter().collect();
        let mut raw_headers = String::new();
        for (name, values) in ordered {
            for value in values {
                raw_headers.push_str(name);
                raw_headers.push_str(": ");
                raw_headers.push_str(value);
                raw_headers.push_str("\r\n");
            }
        }

        Self {
            code,
            url: url.into(),
            headers: normalized,
            raw_headers,
            body: body.into(),
        }
    }

    /// Creates a response from a raw header block.
    ///
    /// Each line is split on its first `:`; lines without one (such as a
    /// status line) are ignored.
    #[must_use]
    pub fn from_raw(
        code: u16,
        url: impl Into<String>,
        header_text: &str,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in parse_header_lines(header_text) {
            headers
                .entry(name.to_ascii_lowercase())
                .or_default()
                .push(value.to_string());
        }

        Self {
            code,
            url: url.into(),
            headers,
            raw_headers: header_text.to_string(),
            body: body.into(),
        }
    }

    /// Returns `true` for statuses 200 to 299.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for statuses 300 to 399.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.code >= 300 && self.code <= 399
    }

    /// Returns `true` for statuses 400 to 499.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.code >= 400 && self.code <= 499
    }

    /// Returns `true` for statuses of 500 and above.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500
    }

    /// Returns `true` for statuses of 400 and above.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.code >= 400
    }

    /// Returns `true` for a 404.
    #[must_use]
    pub const fn not_found_error(&self) -> bool {
        self.code == 404
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the raw header block.
    #[must_use]
    pub fn raw_headers(&self) -> &str {
        &self.raw_headers
    }

    /// Returns the headers as a name to value map, parsed from the raw block.
    ///
    /// Names keep the case they were received with. When a header appears
    /// more than once the last value wins.
    #[must_use]
    pub fn parsed_headers(&self) -> BTreeMap<String, String> {
        parse_header_lines(&self.raw_headers)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns `true` when the body was sent gzip-encoded.
    #[must_use]
    pub fn is_gzipped(&self) -> bool {
        self.headers.get("content-encoding").is_some_and(|values| {
            values
                .iter()
                .any(|value| value.to_ascii_lowercase().contains("gzip"))
        })
    }

    /// Decodes the body as JSON.
    ///
    /// Gzip bodies are inflated first. An empty (or whitespace only) body
    /// decodes to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Gzip`] if a gzip body cannot be inflated and
    /// [`DecodeError::Json`] if the body is not valid JSON.
    pub fn decode_body(&self) -> Result<Option<Value>, DecodeError> {
        let bytes: Cow<'_, [u8]> = if self.is_gzipped() && !self.body.is_empty() {
            let mut inflated = Vec::new();
            GzDecoder::new(self.body.as_slice()).read_to_end(&mut inflated)?;
            Cow::Owned(inflated)
        } else {
            Cow::Borrowed(&self.body)
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Returns the collection size announced by an `X-Total-Count` header.
    ///
    /// The raw header block is scanned for the first `X-Total-Count:` line
    /// (case-insensitive) followed by digits.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.raw_headers.lines().find_map(|line| {
            let line = line.trim_start();
            let prefix = line.get(..TOTAL_COUNT_HEADER.len())?;
            if !prefix.eq_ignore_ascii_case(TOTAL_COUNT_HEADER) {
                return None;
            }
            let rest = line[TOTAL_COUNT_HEADER.len()..].trim_start();
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            rest[..end].parse().ok()
        })
    }

    /// Returns a JSON summary with `url`, `status`, `body` and `headers`.
    ///
    /// The body is included decoded when possible and as raw text otherwise.
    #[must_use]
    pub fn summary(&self) -> Value {
        let body = match self.decode_body() {
            Ok(Some(value)) => value,
            Ok(None) => Value::Null,
            Err(_) => Value::String(self.body_text().into_owned()),
        };

        json!({
            "url": self.url,
            "status": self.code,
            "body": body,
            "headers": self.parsed_headers(),
        })
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

fn parse_header_lines(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.lines().filter_map(|line| {
        let (name, value) = line.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name, value.trim()))
    })
}

// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for packet-capture exports.
//!
//! Packet analyzers can export decoded packets as a JSON array, one object
//! per packet. When specific fields are requested, each packet carries them
//! under `_source.layers` as arrays of strings:
//!
//! ```json
//! [{
//!     "_source": {
//!         "layers": {
//!             "http.host": ["google.com"],
//!             "http.request.method": ["GET"],
//!             "http.request.line": ["Host: google.com\r\n"]
//!         }
//!     }
//! }]
//! ```
//!
//! Only the HTTP/1.x and HTTP/2 fields listed in [`FieldKind`] are kept.
//! Every other key is ignored.
//!
//! # Example
//!
//! ```
//! use shark2uml::capture::{parse_capture, FieldKind};
//!
//! let json = r#"[{ "_source": { "layers": { "http.host": ["google.com"] } } }]"#;
//!
//! let records = parse_capture(json).unwrap();
//! assert_eq!(records[0].scalar(FieldKind::Host), Some("google.com"));
//! ```

use serde::Deserialize;
use snafu::prelude::*;
use std::collections::BTreeMap;

/// Error type for capture parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse capture JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// A recognized protocol field.
///
/// Variants are declared in the order the walker visits them within one
/// record, so a host is always known before the request that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    /// `http.host`
    Host,
    /// `http.request.method`
    RequestMethod,
    /// `http.request.uri`
    RequestUri,
    /// `http.request.version`
    RequestVersion,
    /// `http.request.line` (one entry per header, despite the name)
    RequestHeaderLines,
    /// `http.response.version`
    ResponseVersion,
    /// `http.response.code`
    ResponseStatusCode,
    /// `http.response.code.desc`
    ResponseReasonPhrase,
    /// `http.response.line` (one entry per header)
    ResponseHeaderLines,
    /// `http.file_data`, text or hex
    Body,
    /// `http2.header.name`
    HeaderPairNames,
    /// `http2.header.value`
    HeaderPairValues,
    /// `http2.body.reassembled.data`, usually hex
    ReassembledBody,
}

impl FieldKind {
    /// All recognized fields in walk order.
    pub const ALL: [Self; 13] = [
        Self::Host,
        Self::RequestMethod,
        Self::RequestUri,
        Self::RequestVersion,
        Self::RequestHeaderLines,
        Self::ResponseVersion,
        Self::ResponseStatusCode,
        Self::ResponseReasonPhrase,
        Self::ResponseHeaderLines,
        Self::Body,
        Self::HeaderPairNames,
        Self::HeaderPairValues,
        Self::ReassembledBody,
    ];

    /// The layer key used by the export format.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Host => "http.host",
            Self::RequestMethod => "http.request.method",
            Self::RequestUri => "http.request.uri",
            Self::RequestVersion => "http.request.version",
            Self::RequestHeaderLines => "http.request.line",
            Self::ResponseVersion => "http.response.version",
            Self::ResponseStatusCode => "http.response.code",
            Self::ResponseReasonPhrase => "http.response.code.desc",
            Self::ResponseHeaderLines => "http.response.line",
            Self::Body => "http.file_data",
            Self::HeaderPairNames => "http2.header.name",
            Self::HeaderPairValues => "http2.header.value",
            Self::ReassembledBody => "http2.body.reassembled.data",
        }
    }

    /// Looks up a field by its layer key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// One packet's recognized fields.
///
/// Fields the packet does not carry are simply absent. Records are never
/// modified after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureRecord {
    layers: BTreeMap<FieldKind, Vec<String>>,
}

impl CaptureRecord {
    /// Builds a record from `(field, values)` pairs. Later pairs replace
    /// earlier ones for the same field.
    #[must_use]
    pub fn from_fields<I, V, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (FieldKind, V)>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layers = fields
            .into_iter()
            .map(|(kind, values)| (kind, values.into_iter().map(Into::into).collect()))
            .collect();
        Self { layers }
    }

    /// Returns the first value of a scalar field.
    ///
    /// A field present with an empty list counts as absent.
    #[must_use]
    pub fn scalar(&self, kind: FieldKind) -> Option<&str> {
        self.layers.get(&kind)?.first().map(String::as_str)
    }

    /// Returns every value of a repeated field.
    #[must_use]
    pub fn sequence(&self, kind: FieldKind) -> Option<&[String]> {
        self.layers.get(&kind).map(Vec::as_slice)
    }

    /// Number of recognized fields carried by this record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the record carries no recognized field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<'de> Deserialize<'de> for CaptureRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        let Some(layers) = value
            .get("_source")
            .and_then(|s| s.get("layers"))
            .and_then(serde_json::Value::as_object)
        else {
            return Ok(Self::default());
        };

        let layers = layers
            .iter()
            .filter_map(|(key, field)| Some((FieldKind::from_key(key)?, field_values(field))))
            .collect();

        Ok(Self { layers })
    }
}

/// Flattens a layer value into its string elements.
///
/// Fields are normally arrays of strings. A bare scalar is taken as a
/// one-element array, and numbers or booleans keep their JSON spelling.
fn field_values(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses a JSON capture export into its records.
///
/// # Arguments
///
/// * `json_str` - The raw JSON content: a top-level array of packets
///
/// # Errors
///
/// Returns an error if the JSON is malformed or is not an array.
///
/// # Example
///
/// ```
/// use shark2uml::capture::parse_capture;
///
/// let records = parse_capture("[]").unwrap();
/// assert!(records.is_empty());
/// ```
pub fn parse_capture(json_str: &str) -> Result<Vec<CaptureRecord>, ParseError> {
    serde_json::from_str(json_str).context(JsonSnafu)
}

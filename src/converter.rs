// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! PlantUML document generation for parsed captures.
//!
//! This module wraps the markup produced by
//! [`PlantUmlListener`](crate::listener::PlantUmlListener) in a complete
//! PlantUML document:
//!
//! ```text
//! @startuml
//! skinparam maxMessageSize 500
//!
//! local -> google.com: ...
//! local <<-- google.com: ...
//! @enduml
//! ```
//!
//! # Example
//!
//! ```
//! use shark2uml::capture::{CaptureRecord, FieldKind};
//! use shark2uml::converter::convert;
//!
//! let records = vec![CaptureRecord::from_fields([
//!     (FieldKind::Host, vec!["google.com"]),
//!     (FieldKind::RequestMethod, vec!["GET"]),
//!     (FieldKind::RequestUri, vec!["/"]),
//!     (FieldKind::RequestVersion, vec!["HTTP/1.1"]),
//! ])];
//!
//! let markup = convert(&records);
//!
//! assert!(markup.starts_with("@startuml\n"));
//! assert!(markup.contains("local -> google.com: <color red>GET / HTTP/1.1</color>"));
//! assert!(markup.ends_with("@enduml\n"));
//! ```

use crate::capture::{self, CaptureRecord, ParseError};
use crate::listener::PlantUmlListener;
use crate::walker::walk;

/// Configuration options for diagram generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Value of the `skinparam maxMessageSize` directive.
    ///
    /// Longer messages are wrapped by the renderer.
    pub max_message_size: u32,

    /// Name of the left-hand participant that sends requests.
    pub local_participant: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_message_size: 500,
            local_participant: "local".to_owned(),
        }
    }
}

/// Converts capture records to a PlantUML document with default options.
#[must_use]
pub fn convert(records: &[CaptureRecord]) -> String {
    convert_with(records, &ConvertOptions::default())
}

/// Converts capture records to a PlantUML document.
///
/// Interactions appear in record order. Each call starts from an empty
/// conversation, so no host carries over between calls.
///
/// # Arguments
///
/// * `records` - The parsed capture, in wire order
/// * `opts` - Configuration options controlling the output
#[must_use]
pub fn convert_with(records: &[CaptureRecord], opts: &ConvertOptions) -> String {
    let mut out = String::new();
    out.push_str("@startuml\n");
    out.push_str("skinparam maxMessageSize ");
    out.push_str(&opts.max_message_size.to_string());
    out.push('\n');

    let mut listener = PlantUmlListener::new(&mut out, &opts.local_participant);
    walk(records, &mut listener);

    out.push_str("\n@enduml\n");
    out
}

/// Parses a JSON capture export and converts it in one step.
///
/// The command-line tool uses this for single-file diagrams.
///
/// # Errors
///
/// Returns an error if the JSON cannot be parsed as a capture.
pub fn convert_json(json_str: &str, opts: &ConvertOptions) -> Result<String, ParseError> {
    let records = capture::parse_capture(json_str)?;
    Ok(convert_with(&records, opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::FieldKind;

    #[test]
    fn empty_capture_is_just_the_wrapper() {
        assert_eq!(
            convert(&[]),
            "@startuml\nskinparam maxMessageSize 500\n\n@enduml\n"
        );
    }

    #[test]
    fn records_without_http_fields_add_nothing() {
        let records = [CaptureRecord::default(), CaptureRecord::default()];
        assert_eq!(convert(&records), convert(&[]));
    }

    #[test]
    fn honours_max_message_size() {
        let opts = ConvertOptions {
            max_message_size: 120,
            ..Default::default()
        };
        assert!(convert_with(&[], &opts).starts_with("@startuml\nskinparam maxMessageSize 120\n"));
    }

    #[test]
    fn honours_local_participant() {
        let records = [CaptureRecord::from_fields([
            (FieldKind::Host, vec!["h"]),
            (FieldKind::RequestMethod, vec!["GET"]),
            (FieldKind::RequestUri, vec!["/"]),
            (FieldKind::RequestVersion, vec!["HTTP/1.1"]),
        ])];
        let opts = ConvertOptions {
            local_participant: "browser".into(),
            ..Default::default()
        };
        assert!(convert_with(&records, &opts).contains("\nbrowser -> h: "));
    }

    #[test]
    fn host_does_not_leak_between_calls() {
        let first = [CaptureRecord::from_fields([(FieldKind::Host, vec!["h"])])];
        let second = [CaptureRecord::from_fields([
            (FieldKind::ResponseVersion, vec!["HTTP/1.1"]),
            (FieldKind::ResponseStatusCode, vec!["200"]),
            (FieldKind::ResponseReasonPhrase, vec!["OK"]),
        ])];

        let _ = convert(&first);
        assert!(convert(&second).contains("\nlocal <<-- : "));
    }

    #[test]
    fn output_is_deterministic() {
        let records = [CaptureRecord::from_fields([
            (FieldKind::Host, vec!["h"]),
            (FieldKind::Body, vec!["48656c6c6f"]),
        ])];
        assert_eq!(convert(&records), convert(&records));
    }

    #[test]
    fn convert_json_reports_parse_errors() {
        assert!(convert_json("{", &ConvertOptions::default()).is_err());
    }

    #[test]
    fn convert_json_converts_valid_input() {
        let markup = convert_json("[]", &ConvertOptions::default()).unwrap();
        assert_eq!(markup, convert(&[]));
    }
}

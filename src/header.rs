// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Raw HTTP/1.x header line splitting.

/// Splits a raw `Name: value` header line on its first colon.
///
/// Both halves are trimmed, which also drops the trailing `\r\n` the export
/// keeps on every line. Values may contain further colons (URLs, times) and
/// are kept whole. A line without any colon becomes a name with an empty
/// value.
///
/// # Example
///
/// ```
/// use shark2uml::header::parse_header_line;
///
/// let (name, value) = parse_header_line("Location: http://www.google.com/\r\n");
/// assert_eq!(name, "Location");
/// assert_eq!(value, "http://www.google.com/");
/// ```
#[must_use]
pub fn parse_header_line(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (line.trim(), ""),
    }
}

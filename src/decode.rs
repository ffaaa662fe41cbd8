// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Body payload decoding.
//!
//! Capture exports carry message bodies either as readable text or, for
//! binary or reassembled payloads, as a hex dump of the raw bytes. The
//! [`BodyDecoder`] trait isolates the guess between the two.

use std::borrow::Cow;

/// Turns a raw body field into display text.
pub trait BodyDecoder {
    /// Decodes `value`, returning it unchanged when it is already text.
    fn decode<'a>(&self, value: &'a str) -> Cow<'a, str>;
}

/// Treats a value as hex exactly when it is a non-empty, even-length run of
/// hex digits; anything else is passed through.
///
/// This is a heuristic. A text body made only of an even number of digits
/// (`"1234"`) is indistinguishable from hex and will be decoded as bytes.
/// Decoded bytes that are not valid UTF-8 become U+FFFD, and a leading
/// byte-order mark is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexOrText;

impl BodyDecoder for HexOrText {
    fn decode<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if !looks_like_hex(value) {
            return Cow::Borrowed(value);
        }
        match hex::decode(value) {
            Ok(bytes) => {
                tracing::trace!(bytes = bytes.len(), "decoding hex body");
                let text = String::from_utf8_lossy(&bytes);
                Cow::Owned(text.strip_prefix('\u{feff}').unwrap_or(&*text).to_owned())
            }
            Err(_) => Cow::Borrowed(value),
        }
    }
}

fn looks_like_hex(value: &str) -> bool {
    !value.is_empty() && value.len() % 2 == 0 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decodes `value` with the default [`HexOrText`] heuristic.
///
/// # Example
///
/// ```
/// use shark2uml::decode::decode;
///
/// assert_eq!(decode("48656c6c6f"), "Hello");
/// assert_eq!(decode("<html>"), "<html>");
/// ```
#[must_use]
pub fn decode(value: &str) -> Cow<'_, str> {
    HexOrText.decode(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_hex_text() {
        assert_eq!(decode("48656c6c6f"), "Hello");
        assert_eq!(decode("48656C6C6F"), "Hello");
    }

    #[test]
    fn decodes_multibyte_utf8() {
        // "héllo"
        assert_eq!(decode("68c3a96c6c6f"), "héllo");
    }

    #[test]
    fn decodes_line_breaks_as_control_characters() {
        assert_eq!(decode("610d0a62"), "a\r\nb");
    }

    #[test]
    fn passes_through_plain_text() {
        let input = "<HTML><HEAD>301 Moved</HEAD></HTML>\r\n";
        assert!(matches!(decode(input), Cow::Borrowed(s) if s == input));
    }

    #[test]
    fn passes_through_odd_length_hex() {
        assert_eq!(decode("abc"), "abc");
    }

    #[test]
    fn passes_through_empty_string() {
        assert_eq!(decode(""), "");
    }

    #[test]
    fn passes_through_hex_with_spaces_or_prefix() {
        assert_eq!(decode("48 65"), "48 65");
        assert_eq!(decode("0x4865"), "0x4865");
    }

    #[test]
    fn numeric_text_is_decoded_as_hex() {
        // Known limitation of the heuristic: "4142" is read as bytes "AB".
        assert_eq!(decode("4142"), "AB");
    }

    #[test]
    fn strips_leading_byte_order_mark() {
        assert_eq!(decode("efbbbf48"), "H");
        assert_eq!(decode("efbbbf"), "");
    }

    #[test]
    fn keeps_byte_order_mark_after_start() {
        assert_eq!(decode("48efbbbf"), "H\u{feff}");
    }

    #[test]
    fn invalid_utf8_becomes_replacement_character() {
        assert_eq!(decode("ff"), "\u{fffd}");
    }
}

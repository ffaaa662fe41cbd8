// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Field callbacks and the PlantUML markup they produce.
//!
//! The [`walker`](crate::walker) reports every recognized field of a capture
//! through the [`CaptureListener`] callbacks. [`PlantUmlListener`] turns those
//! callbacks into sequence-diagram markup:
//!
//! ```text
//! local -> google.com: <color red>GET / HTTP/1.1</color>\n<color blue>Host</color>: <color green>google.com</color>\n\n
//! local <<-- google.com: <color red>HTTP/1.1 301 Moved Permanently</color>\n
//! ```
//!
//! Line breaks inside a message are written as the two characters `\n` (and
//! `\r`), which PlantUML interprets itself. A real newline only ever starts a
//! new arrow.

use crate::decode::{BodyDecoder, HexOrText};
use crate::header::parse_header_line;

/// Escaped line break inside a diagram message.
const BREAK: &str = "\\n";

/// Callbacks for each recognized capture field.
///
/// All methods default to doing nothing, so an implementation only needs
/// the fields it cares about.
#[allow(unused_variables)]
pub trait CaptureListener {
    /// `http.host`
    fn enter_host(&mut self, host: &str) {}
    /// `http.request.method`
    fn enter_request_method(&mut self, method: &str) {}
    /// `http.request.uri`
    fn enter_request_uri(&mut self, uri: &str) {}
    /// `http.request.version`
    fn enter_request_version(&mut self, version: &str) {}
    /// `http.request.line`, raw `Name: value\r\n` lines
    fn enter_request_headers(&mut self, headers: &[String]) {}
    /// `http.response.version`
    fn enter_response_version(&mut self, version: &str) {}
    /// `http.response.code`
    fn enter_status_code(&mut self, code: &str) {}
    /// `http.response.code.desc`
    fn enter_reason_phrase(&mut self, reason: &str) {}
    /// `http.response.line`, raw `Name: value\r\n` lines
    fn enter_response_headers(&mut self, headers: &[String]) {}
    /// `http.file_data`
    fn enter_body(&mut self, body: &str) {}
    /// `http2.header.name` and `http2.header.value`, index-aligned
    fn enter_header_pairs(&mut self, names: &[String], values: &[String]) {}
    /// `http2.body.reassembled.data`
    fn enter_reassembled_body(&mut self, body: &str) {}
}

/// Context shared by consecutive interactions of one conversion run.
///
/// The host is set by `http.host` or an HTTP/2 `:authority` header and
/// stays in effect until replaced, including across records. A response is
/// therefore drawn against the most recent host seen, whichever record it
/// came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    host: Option<String>,
}

impl Conversation {
    /// The current remote host, if one has been seen.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Replaces the current remote host.
    pub fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrow {
    Request,
    Response,
}

impl Arrow {
    const fn markup(self) -> &'static str {
        match self {
            Self::Request => "->",
            Self::Response => "<<--",
        }
    }
}

/// Whether an HTTP/1.x start line is still being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    AwaitingInteraction,
    InStartLine,
}

/// Writes PlantUML sequence-diagram markup for each reported field.
///
/// Output is appended to a caller-owned buffer; nothing written is ever
/// read back. One listener serves exactly one conversion run.
#[derive(Debug)]
pub struct PlantUmlListener<'a, D = HexOrText> {
    out: &'a mut String,
    local: &'a str,
    conversation: Conversation,
    state: LineState,
    decoder: D,
}

impl<'a> PlantUmlListener<'a> {
    /// Creates a listener that draws `local` as the left-hand participant.
    #[must_use]
    pub fn new(out: &'a mut String, local: &'a str) -> Self {
        Self::with_decoder(out, local, HexOrText)
    }
}

impl<'a, D: BodyDecoder> PlantUmlListener<'a, D> {
    /// Creates a listener with a custom body decoder.
    #[must_use]
    pub fn with_decoder(out: &'a mut String, local: &'a str, decoder: D) -> Self {
        Self {
            out,
            local,
            conversation: Conversation::default(),
            state: LineState::AwaitingInteraction,
            decoder,
        }
    }

    /// The conversation context accumulated so far.
    #[must_use]
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Starts a new arrow: `\n{local} {arrow} {host}:`.
    fn open_interaction(&mut self, arrow: Arrow) {
        let host = self.conversation.host().unwrap_or_else(|| {
            tracing::warn!(arrow = arrow.markup(), "no host known for interaction");
            ""
        });
        self.out.push('\n');
        self.out.push_str(self.local);
        self.out.push(' ');
        self.out.push_str(arrow.markup());
        self.out.push(' ');
        self.out.push_str(host);
        self.out.push(':');
    }

    fn open_start_line(&mut self, arrow: Arrow, first: &str) {
        if self.state == LineState::InStartLine {
            tracing::debug!("start line opened before the previous one was closed");
        }
        self.open_interaction(arrow);
        self.out.push_str(" <color red>");
        self.push_word(first);
        self.state = LineState::InStartLine;
    }

    fn close_start_line(&mut self, last: &str) {
        if self.state == LineState::AwaitingInteraction {
            tracing::debug!("start line closed without being opened");
        }
        self.out.push_str(last);
        self.out.push_str("</color>");
        self.out.push_str(BREAK);
        self.state = LineState::AwaitingInteraction;
    }

    fn push_word(&mut self, word: &str) {
        self.out.push_str(word);
        self.out.push(' ');
    }

    /// Writes one `name: value` line, then a blank line after the last one.
    fn push_headers<'h>(&mut self, headers: impl IntoIterator<Item = (&'h str, &'h str)>) {
        let mut any = false;
        for (name, value) in headers {
            self.out.push_str("<color blue>");
            self.out.push_str(name);
            self.out.push_str("</color>: <color green>");
            self.out.push_str(value);
            self.out.push_str("</color>");
            self.out.push_str(BREAK);
            any = true;
        }
        if any {
            self.out.push_str(BREAK);
        }
    }

    fn push_header_lines(&mut self, lines: &[String]) {
        self.push_headers(lines.iter().map(|line| parse_header_line(line)));
    }

    fn push_body(&mut self, body: &str) {
        let decoded = self.decoder.decode(body);
        self.out
            .push_str(&decoded.replace('\r', "\\r").replace('\n', "\\n"));
    }
}

impl<D: BodyDecoder> CaptureListener for PlantUmlListener<'_, D> {
    fn enter_host(&mut self, host: &str) {
        self.conversation.set_host(Some(host.to_owned()));
    }

    fn enter_request_method(&mut self, method: &str) {
        self.open_start_line(Arrow::Request, method);
    }

    fn enter_request_uri(&mut self, uri: &str) {
        self.push_word(uri);
    }

    fn enter_request_version(&mut self, version: &str) {
        self.close_start_line(version);
    }

    fn enter_request_headers(&mut self, headers: &[String]) {
        self.push_header_lines(headers);
    }

    fn enter_response_version(&mut self, version: &str) {
        self.open_start_line(Arrow::Response, version);
    }

    fn enter_status_code(&mut self, code: &str) {
        self.push_word(code);
    }

    fn enter_reason_phrase(&mut self, reason: &str) {
        self.close_start_line(reason);
    }

    fn enter_response_headers(&mut self, headers: &[String]) {
        self.push_header_lines(headers);
    }

    fn enter_body(&mut self, body: &str) {
        self.push_body(body);
    }

    fn enter_header_pairs(&mut self, names: &[String], values: &[String]) {
        if names.len() != values.len() {
            tracing::warn!(
                names = names.len(),
                values = values.len(),
                "header name and value counts differ, extra entries dropped"
            );
        }

        if names.iter().any(|name| name == ":method") {
            let authority = names
                .iter()
                .position(|name| name == ":authority")
                .and_then(|i| values.get(i))
                .cloned();
            self.conversation.set_host(authority);
            self.open_interaction(Arrow::Request);
            self.out.push_str(BREAK);
        } else if names.iter().any(|name| name == ":status") {
            self.open_interaction(Arrow::Response);
            self.out.push_str(BREAK);
        }

        self.push_headers(
            names
                .iter()
                .zip(values)
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
    }

    fn enter_reassembled_body(&mut self, body: &str) {
        self.push_body(body);
    }
}

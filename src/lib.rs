// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert packet-capture JSON exports to PlantUML sequence diagrams.
//!
//! This crate turns the JSON produced by a packet analyzer's field export
//! into a PlantUML sequence diagram of the HTTP/1.x and HTTP/2 exchanges it
//! contains: one arrow per request or response, with the start line,
//! headers and body written into the message.
//!
//! # Overview
//!
//! 1. [`capture`] parses the JSON array into typed records
//! 2. [`walker`] reports each record's fields, in order, to a listener
//! 3. [`listener`] formats those fields as diagram markup
//! 4. [`converter`] wraps the markup in a complete document
//!
//! # Example
//!
//! ```no_run
//! use shark2uml::{capture, converter};
//!
//! let json = std::fs::read_to_string("capture.json").unwrap();
//! let records = capture::parse_capture(&json).unwrap();
//!
//! let opts = converter::ConvertOptions {
//!     max_message_size: 800,
//!     ..Default::default()
//! };
//!
//! let markup = converter::convert_with(&records, &opts);
//! println!("{markup}");
//! ```
//!
//! # Modules
//!
//! - [`capture`]: JSON parsing and the recognized field set
//! - [`decode`]: hex-or-text body decoding
//! - [`header`]: raw header line splitting
//! - [`listener`]: field callbacks and PlantUML formatting
//! - [`walker`]: record traversal
//! - [`converter`]: document generation with configurable options

#![deny(missing_docs)]

pub mod capture;
pub mod converter;
pub mod decode;
pub mod header;
pub mod listener;
pub mod walker;

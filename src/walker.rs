// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Traversal of capture records.
//!
//! [`walk`] visits records in input order and, within a record, reports
//! fields in [`FieldKind::ALL`] order. A host carried by the same record is
//! therefore always reported before its request.

use crate::capture::{CaptureRecord, FieldKind};
use crate::listener::CaptureListener;

/// Reports every recognized field of every record to `listener`.
///
/// Absent fields are skipped. The two HTTP/2 header arrays are reported
/// together, and only when both are present.
pub fn walk<L: CaptureListener + ?Sized>(records: &[CaptureRecord], listener: &mut L) {
    tracing::debug!(records = records.len(), "walking capture");
    for (index, record) in records.iter().enumerate() {
        tracing::debug!(index, fields = record.len(), "walking record");
        walk_record(record, listener);
    }
}

fn walk_record<L: CaptureListener + ?Sized>(record: &CaptureRecord, listener: &mut L) {
    for kind in FieldKind::ALL {
        match kind {
            FieldKind::Host => {
                if let Some(host) = record.scalar(kind) {
                    listener.enter_host(host);
                }
            }
            FieldKind::RequestMethod => {
                if let Some(method) = record.scalar(kind) {
                    listener.enter_request_method(method);
                }
            }
            FieldKind::RequestUri => {
                if let Some(uri) = record.scalar(kind) {
                    listener.enter_request_uri(uri);
                }
            }
            FieldKind::RequestVersion => {
                if let Some(version) = record.scalar(kind) {
                    listener.enter_request_version(version);
                }
            }
            FieldKind::RequestHeaderLines => {
                if let Some(headers) = record.sequence(kind) {
                    listener.enter_request_headers(headers);
                }
            }
            FieldKind::ResponseVersion => {
                if let Some(version) = record.scalar(kind) {
                    listener.enter_response_version(version);
                }
            }
            FieldKind::ResponseStatusCode => {
                if let Some(code) = record.scalar(kind) {
                    listener.enter_status_code(code);
                }
            }
            FieldKind::ResponseReasonPhrase => {
                if let Some(reason) = record.scalar(kind) {
                    listener.enter_reason_phrase(reason);
                }
            }
            FieldKind::ResponseHeaderLines => {
                if let Some(headers) = record.sequence(kind) {
                    listener.enter_response_headers(headers);
                }
            }
            FieldKind::Body => {
                if let Some(body) = record.scalar(kind) {
                    listener.enter_body(body);
                }
            }
            FieldKind::HeaderPairNames => {
                if let (Some(names), Some(values)) = (
                    record.sequence(kind),
                    record.sequence(FieldKind::HeaderPairValues),
                ) {
                    listener.enter_header_pairs(names, values);
                }
            }
            // Reported with the names above.
            FieldKind::HeaderPairValues => {}
            FieldKind::ReassembledBody => {
                if let Some(body) = record.scalar(kind) {
                    listener.enter_reassembled_body(body);
                }
            }
        }
    }
}

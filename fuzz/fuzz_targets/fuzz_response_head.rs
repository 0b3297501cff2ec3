//! Fuzz target: HTTP response-head parsing
//!
//! Drives arbitrary bytes through the status-line parser and the
//! best-effort JSON ack parser and asserts that neither ever panics,
//! and that a status is only ever extracted from an `HTTP/`-prefixed
//! line.
//!
//! cargo fuzz run fuzz_response_head

#![no_main]

use doorsign::adapters::notifier::{is_success_status, parse_event_ack, parse_status_line};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Ack bodies arrive as raw bytes off the socket; malformed or truncated
    // JSON must degrade to None, never to a panic.
    let _ = parse_event_ack(data);

    if let Ok(text) = core::str::from_utf8(data) {
        if let Some(status) = parse_status_line(text) {
            assert!(
                text.trim_start().starts_with("HTTP/"),
                "status parsed from a non-HTTP line"
            );
            // Classification is total over u16.
            let _ = is_success_status(status);
        }
    }
});

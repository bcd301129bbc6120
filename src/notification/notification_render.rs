//! Notification rendering
//!
//! Plain-text and JSON-line renderings of channel transitions, used by the
//! console observer in the binary.

use std::time::Duration;

use serde::Serialize;

use super::notification_state::Toast;

/// Render one transition as `[+S.mmms] kind: message` or `[+S.mmms] (empty)`
pub fn render_line(elapsed: Duration, value: Option<&Toast>) -> String {
    let stamp = format!("[+{}.{:03}s]", elapsed.as_secs(), elapsed.subsec_millis());
    match value {
        Some(toast) => format!("{} {}: {}", stamp, toast.kind, toast.message),
        None => format!("{} (empty)", stamp),
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    elapsed_ms: u128,
    toast: Option<&'a Toast>,
}

/// Render one transition as a single JSON object
pub fn render_json(elapsed: Duration, value: Option<&Toast>) -> serde_json::Result<String> {
    serde_json::to_string(&JsonLine {
        elapsed_ms: elapsed.as_millis(),
        toast: value,
    })
}

#[cfg(test)]
#[path = "notification_render_tests.rs"]
mod notification_render_tests;

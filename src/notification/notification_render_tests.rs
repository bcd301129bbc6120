//! Tests for notification_render

use super::*;
use insta::assert_snapshot;

fn render_transitions(transitions: &[(u64, Option<Toast>)]) -> String {
    transitions
        .iter()
        .map(|(ms, value)| render_line(Duration::from_millis(*ms), value.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_publish_then_clear() {
    let output = render_transitions(&[
        (0, None),
        (0, Some(Toast::success("Saved successfully"))),
        (3000, None),
    ]);
    assert_snapshot!(output, @r"
    [+0.000s] (empty)
    [+0.000s] success: Saved successfully
    [+3.000s] (empty)
    ");
}

#[test]
fn snapshot_overlapping_publishes() {
    let output = render_transitions(&[
        (0, Some(Toast::success("Uploading"))),
        (1250, Some(Toast::error("Upload failed"))),
        (4250, None),
    ]);
    assert_snapshot!(output, @r"
    [+0.000s] success: Uploading
    [+1.250s] error: Upload failed
    [+4.250s] (empty)
    ");
}

#[test]
fn test_empty_message_renders_as_is() {
    let line = render_line(Duration::from_millis(7), Some(&Toast::error("")));
    assert_eq!(line, "[+0.007s] error: ");
}

#[test]
fn test_json_line_for_toast() {
    let line = render_json(Duration::from_millis(1500), Some(&Toast::success("Copied"))).unwrap();
    assert_eq!(
        line,
        r#"{"elapsed_ms":1500,"toast":{"message":"Copied","kind":"success"}}"#
    );
}

#[test]
fn test_json_line_for_cleared() {
    let line = render_json(Duration::from_secs(3), None).unwrap();
    assert_eq!(line, r#"{"elapsed_ms":3000,"toast":null}"#);
}

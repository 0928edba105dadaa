/// Edge case integration tests
///
/// These tests cover filesystem quirks, data edge cases, and other unusual scenarios
mod common;

use std::fs;

use artifact_extractor::discovery::discover_projects;
use artifact_extractor::parse_session_file;
use common::{ClaudeDirBuilder, EntryBuilder, SessionFileBuilder};

fn write_session(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let claude_dir = ClaudeDirBuilder::new().with_project("-Users-test-project", &[]).build();
    let path = claude_dir.path().join("projects/-Users-test-project/s.jsonl");
    fs::write(&path, content).unwrap();
    (claude_dir, path)
}

#[test]
fn test_edge_case_empty_and_whitespace_lines() {
    let content = format!(
        "{}\n\n   \n\t\n{}\n",
        EntryBuilder::user().text("Entry 1").to_json(),
        EntryBuilder::assistant().to_json()
    );
    let (_dir, path) = write_session(content.as_bytes());

    let log = parse_session_file(&path).unwrap();
    assert_eq!(log.turns().count(), 2);
    assert_eq!(log.skipped_lines, 0, "Blank lines are not counted as skipped");
}

#[test]
fn test_edge_case_empty_file() {
    let (_dir, path) = write_session(b"");
    let log = parse_session_file(&path).unwrap();
    assert!(log.entries.is_empty());
    assert_eq!(log.skipped_lines, 0);
    assert!(log.cwd.is_none());
}

#[test]
fn test_edge_case_mixed_line_endings() {
    let content = format!(
        "{}\r\n{}\n{}",
        EntryBuilder::user().text("one").to_json(),
        EntryBuilder::assistant().to_json(),
        EntryBuilder::user().text("three").to_json()
    );
    let (_dir, path) = write_session(content.as_bytes());

    let log = parse_session_file(&path).unwrap();
    let texts: Vec<&str> = log.turns().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["one", "Test response", "three"]);
}

#[test]
fn test_edge_case_truncated_final_line() {
    let content = format!(
        "{}\n{{\"type\":\"assistant\",\"message\":{{\"content\":[{{\"type\":\"te",
        EntryBuilder::user().to_json()
    );
    let (_dir, path) = write_session(content.as_bytes());

    let log = parse_session_file(&path).unwrap();
    assert_eq!(log.turns().count(), 1);
    assert_eq!(log.skipped_lines, 1);
}

#[test]
fn test_edge_case_invalid_utf8_line_is_skipped() {
    let mut content = EntryBuilder::user().text("before").to_json().into_bytes();
    content.extend_from_slice(b"\n{\"type\":\"user\",\"x\":\"\xff\xfe\"}\n");
    content.extend_from_slice(EntryBuilder::user().text("after").to_json().as_bytes());
    let (_dir, path) = write_session(&content);

    let log = parse_session_file(&path).unwrap();
    let texts: Vec<&str> = log.turns().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["before", "after"]);
    assert_eq!(log.skipped_lines, 1);
}

#[test]
fn test_edge_case_unicode_content() {
    let text = "Hello 👋 世界 🌍 Ñoño\nsecond line";
    let (_dir, path) = write_session(EntryBuilder::user().text(text).to_json().as_bytes());

    let log = parse_session_file(&path).unwrap();
    assert_eq!(log.turns().next().unwrap().text, text);
}

#[test]
fn test_edge_case_numeric_timestamps_are_kept() {
    let (_dir, path) = write_session(
        EntryBuilder::user().to_json().replace(r#""2025-11-02T09:41:20.016Z""#, "1730540480016").as_bytes(),
    );

    let log = parse_session_file(&path).unwrap();
    assert_eq!(log.turns().next().unwrap().timestamp.as_deref(), Some("1730540480016"));
}

#[test]
fn test_edge_case_message_without_content() {
    let (_dir, path) = write_session(br#"{"type":"assistant","message":{"role":"assistant"}}"#);

    let log = parse_session_file(&path).unwrap();
    let turn = log.turns().next().unwrap();
    assert!(turn.is_empty());
    assert_eq!(log.skipped_lines, 0);
}

#[test]
fn test_edge_case_legacy_percent_encoded_project_dir() {
    let claude_dir = ClaudeDirBuilder::new()
        .with_project(
            "-Users%2Ftest%2Fmy-app",
            &[SessionFileBuilder::new("s.jsonl").with_entry(EntryBuilder::user())],
        )
        .build();

    let projects = discover_projects(&claude_dir.path().join("projects")).unwrap();
    assert_eq!(projects[0].project.raw, "-Users%2Ftest%2Fmy-app");
    assert_eq!(projects[0].project.decoded, "/Users/test/my-app");

    let log = parse_session_file(&projects[0].session_files[0]).unwrap();
    assert_eq!(log.project.decoded, "/Users/test/my-app");
}

#[test]
fn test_edge_case_project_dir_with_dashes_is_best_effort() {
    let claude_dir = ClaudeDirBuilder::new()
        .with_project(
            "-Users-test-my-app",
            &[SessionFileBuilder::new("s.jsonl").with_entry(EntryBuilder::user())],
        )
        .build();

    let projects = discover_projects(&claude_dir.path().join("projects")).unwrap();
    // Dashes in the original path cannot be told apart from separators
    assert_eq!(projects[0].project.decoded, "/Users/test/my/app");
    assert_eq!(projects[0].project.raw, "-Users-test-my-app");
}

#[cfg(unix)]
#[test]
fn test_edge_case_unreadable_session_file_fails_that_session_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = write_session(EntryBuilder::user().to_json().as_bytes());
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can still read the file
    if fs::read(&path).is_ok() {
        return;
    }
    let err = parse_session_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to open session file"));
}

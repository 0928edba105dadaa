//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for creating test .claude directory structures
pub struct ClaudeDirBuilder {
    temp_dir: TempDir,
}

impl ClaudeDirBuilder {
    /// Create a new builder with an empty .claude directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the .claude directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a project directory with the given encoded name and session files
    pub fn with_project(self, encoded_name: &str, session_files: &[SessionFileBuilder]) -> Self {
        let project_dir = self.temp_dir.path().join("projects").join(encoded_name);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for session_file in session_files {
            session_file.create_in(&project_dir);
        }

        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ClaudeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a session log file
pub struct SessionFileBuilder {
    filename: String,
    lines: Vec<String>,
}

impl SessionFileBuilder {
    /// Create a new session file with the given filename
    pub fn new(filename: &str) -> Self {
        Self { filename: filename.to_string(), lines: Vec::new() }
    }

    /// Add an entry
    pub fn with_entry(mut self, entry: EntryBuilder) -> Self {
        self.lines.push(entry.to_json());
        self
    }

    /// Add a raw line, e.g. garbage or a truncated write
    pub fn with_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Create the file in the given directory
    pub fn create_in(&self, dir: &Path) -> PathBuf {
        let file_path = dir.join(&self.filename);
        let mut file = fs::File::create(&file_path).expect("Failed to create session file");
        file.write_all(self.lines.join("\n").as_bytes()).expect("Failed to write session file");
        file_path
    }
}

/// Builder for one session log entry
pub struct EntryBuilder {
    value: Value,
}

impl EntryBuilder {
    /// A user message with plain string content
    pub fn user() -> Self {
        Self {
            value: json!({
                "type": "user",
                "message": {"role": "user", "content": "Test message"},
                "timestamp": "2025-11-02T09:41:20.016Z",
                "sessionId": "550e8400-e29b-41d4-a716-446655440000",
                "uuid": "550e8400-e29b-41d4-a716-446655440001",
                "cwd": "/Users/test/project"
            }),
        }
    }

    /// An assistant message with a single text block
    pub fn assistant() -> Self {
        Self {
            value: json!({
                "type": "assistant",
                "message": {
                    "role": "assistant",
                    "model": "claude-sonnet-4-5",
                    "content": [text_block("Test response")]
                },
                "timestamp": "2025-11-02T09:41:25.000Z",
                "sessionId": "550e8400-e29b-41d4-a716-446655440000",
                "uuid": "550e8400-e29b-41d4-a716-446655440002"
            }),
        }
    }

    /// A user entry that only carries a tool result
    pub fn tool_result(tool_use_id: &str, content: &str) -> Self {
        Self::user().content(json!([tool_result_block(tool_use_id, content, false)]))
    }

    pub fn file_history_snapshot() -> Self {
        Self {
            value: json!({
                "type": "file-history-snapshot",
                "messageId": "m1",
                "snapshot": {"trackedFileBackups": {}}
            }),
        }
    }

    pub fn queue_operation() -> Self {
        Self {
            value: json!({"type": "queue-operation", "operation": "enqueue", "content": "later"}),
        }
    }

    /// Any other entry type, e.g. `summary`
    pub fn other(entry_type: &str) -> Self {
        Self { value: json!({"type": entry_type, "summary": "Something"}) }
    }

    /// Set the message text (plain string content)
    pub fn text(self, text: &str) -> Self {
        self.content(json!(text))
    }

    /// Set message content (string or array of blocks)
    pub fn content(mut self, content: Value) -> Self {
        self.value["message"]["content"] = content;
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.value["message"]["model"] = json!(model);
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.value["timestamp"] = json!(timestamp);
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.value["cwd"] = json!(cwd);
        self
    }

    pub fn session_id(mut self, session_id: &str) -> Self {
        self.value["sessionId"] = json!(session_id);
        self
    }

    pub fn agent_id(mut self, agent_id: &str) -> Self {
        self.value["agentId"] = json!(agent_id);
        self
    }

    /// Mark this entry as the result of a Task call that launched a sub-agent
    pub fn spawns_agent(mut self, agent_id: &str, description: &str) -> Self {
        self.value["toolUseResult"] =
            json!({"agentId": agent_id, "description": description, "status": "completed"});
        self
    }

    /// Convert to a JSON line
    pub fn to_json(&self) -> String {
        self.value.to_string()
    }
}

pub fn text_block(text: &str) -> Value {
    json!({"type": "text", "text": text})
}

pub fn thinking_block(text: &str) -> Value {
    json!({"type": "thinking", "thinking": text})
}

pub fn tool_use_block(id: &str, name: &str, input: Value) -> Value {
    json!({"type": "tool_use", "id": id, "name": name, "input": input})
}

pub fn tool_result_block(tool_use_id: &str, content: &str, is_error: bool) -> Value {
    json!({"type": "tool_result", "tool_use_id": tool_use_id, "content": content, "is_error": is_error})
}

/// Builder for a browser user-data root with profiles and IndexedDB origins
pub struct ChromeDirBuilder {
    temp_dir: TempDir,
}

impl ChromeDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add an empty profile directory
    pub fn with_profile(self, profile: &str) -> Self {
        fs::create_dir_all(self.temp_dir.path().join(profile)).expect("Failed to create profile");
        self
    }

    /// Add an origin directory with a LevelDB `CURRENT` file and some table data
    pub fn with_origin(self, profile: &str, origin: &str) -> Self {
        let dir = self.origin_dir(profile, &format!("{}.indexeddb.leveldb", origin));
        fs::write(dir.join("CURRENT"), "MANIFEST-000001\n").expect("Failed to write CURRENT");
        fs::write(dir.join("MANIFEST-000001"), [0u8; 16]).expect("Failed to write MANIFEST");
        fs::write(dir.join("000003.log"), b"records").expect("Failed to write log");
        self
    }

    /// Add an origin directory that fails the LevelDB marker check
    pub fn with_unmarked_origin(self, profile: &str, origin: &str) -> Self {
        let dir = self.origin_dir(profile, &format!("{}.indexeddb.leveldb", origin));
        fs::write(dir.join("junk"), b"not leveldb").expect("Failed to write junk");
        self
    }

    /// Add a blob sibling directory
    pub fn with_blob_dir(self, profile: &str, origin: &str) -> Self {
        self.origin_dir(profile, &format!("{}.indexeddb.blob", origin));
        self
    }

    fn origin_dir(&self, profile: &str, name: &str) -> PathBuf {
        let dir = self.temp_dir.path().join(profile).join("IndexedDB").join(name);
        fs::create_dir_all(&dir).expect("Failed to create origin dir");
        dir
    }

    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ChromeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Count entries directly under `dir` whose names start with `prefix`
pub fn count_entries_with_prefix(dir: &Path, prefix: &str) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries.flatten().filter(|e| e.file_name().to_string_lossy().starts_with(prefix)).count()
        })
        .unwrap_or(0)
}

/// Helper to create a realistic .claude directory with a main session and a sub-agent log
pub fn realistic_claude_dir() -> TempDir {
    ClaudeDirBuilder::new()
        .with_project(
            "-Users-test-project",
            &[
                SessionFileBuilder::new("550e8400-e29b-41d4-a716-446655440000.jsonl")
                    .with_entry(EntryBuilder::file_history_snapshot())
                    .with_entry(EntryBuilder::user().text("Hello from project"))
                    .with_entry(EntryBuilder::assistant())
                    .with_entry(EntryBuilder::queue_operation()),
                SessionFileBuilder::new("agent-1a2b3c.jsonl")
                    .with_entry(EntryBuilder::user().text("Sub task").agent_id("1a2b3c")),
            ],
        )
        .with_project(
            "-Users-test-other",
            &[SessionFileBuilder::new("s2.jsonl").with_entry(
                EntryBuilder::user().text("Other").session_id("7c9e6679-7425-40de-944b-e07fc1f90ae7"),
            )],
        )
        .build()
}

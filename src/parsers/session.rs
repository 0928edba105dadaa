use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{AgentSpawn, Role, SessionEntry, SessionLog, ToolInvocation, ToolResult, Turn};
use crate::parsers::deserializers::raw_timestamp;
use crate::utils::decode_project_dir;

const ENTRY_TYPE_USER: &str = "user";
const ENTRY_TYPE_ASSISTANT: &str = "assistant";
const ENTRY_TYPE_FILE_SNAPSHOT: &str = "file-history-snapshot";
const ENTRY_TYPE_QUEUE_OPERATION: &str = "queue-operation";
const AGENT_FILE_PREFIX: &str = "agent-";

/// Session-level metadata collected while scanning
#[derive(Debug, Default)]
struct SessionMeta {
    agent_id: Option<String>,
    session_id: Option<String>,
    cwd: Option<String>,
}

impl SessionMeta {
    fn observe(&mut self, value: &Value) {
        fill_from(&mut self.agent_id, value, "agentId");
        fill_from(&mut self.session_id, value, "sessionId");
        fill_from(&mut self.cwd, value, "cwd");
    }
}

fn fill_from(slot: &mut Option<String>, value: &Value, field: &str) {
    if slot.is_none()
        && let Some(s) = value.get(field).and_then(Value::as_str)
        && !s.is_empty()
    {
        *slot = Some(s.to_string());
    }
}

/// Entries and counters produced by one pass over a session log
#[derive(Debug, Default)]
pub struct ParsedLines {
    pub entries: Vec<SessionEntry>,
    pub skipped_lines: usize,
    agent_id: Option<String>,
    session_id: Option<String>,
    cwd: Option<String>,
}

/// Parse a Claude Code session file (main session or `agent-*.jsonl` sub-agent log)
///
/// Session id is the file stem and the project path is decoded from the parent
/// directory name. Only I/O failures fail the session; malformed lines are counted in
/// [`SessionLog::skipped_lines`] and skipped.
pub fn parse_session_file(path: &Path) -> Result<SessionLog> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;
    let parsed = parse_session_lines(BufReader::new(file), path)?;

    let session_id =
        path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let project_dir_name = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if parsed.skipped_lines > 0 {
        warn!(
            "Parsed {}: {} entries ({} lines skipped)",
            path.display(),
            parsed.entries.len(),
            parsed.skipped_lines
        );
    }

    Ok(SessionLog {
        is_agent: session_id.starts_with(AGENT_FILE_PREFIX),
        session_id,
        path: path.to_path_buf(),
        project: decode_project_dir(&project_dir_name),
        agent_id: parsed.agent_id,
        parent_session_id: parsed.session_id,
        cwd: parsed.cwd,
        entries: parsed.entries,
        skipped_lines: parsed.skipped_lines,
    })
}

/// Classify every line of a session log, strictly in file order
///
/// Each non-blank line must be a JSON object with a string `type` field. Lines that are
/// not JSON, not objects, or lack `type` are counted as skipped and never stop the
/// scan. Entries are never reordered.
///
/// `source` is only used in log messages.
pub fn parse_session_lines<R: BufRead>(mut reader: R, source: &Path) -> Result<ParsedLines> {
    let mut parsed = ParsedLines::default();
    let mut meta = SessionMeta::default();
    let mut buf = Vec::new();
    let mut line_num = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read from session file {}", source.display()))?;
        if read == 0 {
            break;
        }
        line_num += 1;

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        match classify_line(line) {
            Ok((entry, raw)) => {
                if let Some(raw) = raw {
                    meta.observe(&raw);
                }
                parsed.entries.push(entry);
            }
            Err(reason) => {
                debug!("Skipping line {} in {}: {}", line_num, source.display(), reason);
                parsed.skipped_lines += 1;
            }
        }
    }

    parsed.agent_id = meta.agent_id;
    parsed.session_id = meta.session_id;
    parsed.cwd = meta.cwd;
    Ok(parsed)
}

/// Classify one line; returns the entry plus the raw object for metadata collection
/// when the entry does not already own it
fn classify_line(line: &[u8]) -> std::result::Result<(SessionEntry, Option<Value>), String> {
    let value: Value = serde_json::from_slice(line).map_err(|e| format!("invalid JSON: {}", e))?;

    let entry_type = match value.get("type").and_then(Value::as_str) {
        Some(t) => t.to_string(),
        None => return Err("missing string `type` field".to_string()),
    };

    match entry_type.as_str() {
        ENTRY_TYPE_USER | ENTRY_TYPE_ASSISTANT => {
            let role =
                if entry_type == ENTRY_TYPE_USER { Role::User } else { Role::Assistant };
            let turn = build_turn(role, &value);
            let entry = match role {
                Role::User => SessionEntry::User(turn),
                Role::Assistant => SessionEntry::Assistant(turn),
            };
            Ok((entry, Some(value)))
        }
        ENTRY_TYPE_FILE_SNAPSHOT => Ok((SessionEntry::FileHistorySnapshot(value), None)),
        ENTRY_TYPE_QUEUE_OPERATION => Ok((SessionEntry::QueueOperation(value), None)),
        _ => {
            let mut meta_value = None;
            if value.get("sessionId").is_some() || value.get("cwd").is_some() {
                meta_value = Some(value.clone());
            }
            Ok((SessionEntry::Other { entry_type, raw: value }, meta_value))
        }
    }
}

/// Build a turn from a user/assistant object
///
/// Fields with unexpected JSON types read as absent, so a typed entry always yields a
/// turn.
fn build_turn(role: Role, line: &Value) -> Turn {
    let message = line.get("message");
    let mut turn = Turn {
        role,
        timestamp: line.get("timestamp").and_then(raw_timestamp),
        uuid: str_field(line, "uuid"),
        model: message.and_then(|m| str_field(m, "model")).filter(|m| !m.is_empty()),
        text: String::new(),
        thinking: String::new(),
        tool_calls: Vec::new(),
        tool_results: Vec::new(),
        tool_result_only: false,
        spawned_agent: agent_spawn(line),
    };

    let blocks: &[Value] = match message.and_then(|m| m.get("content")) {
        Some(Value::String(text)) => {
            turn.text = text.clone();
            return turn;
        }
        Some(Value::Array(blocks)) => blocks.as_slice(),
        _ => &[],
    };

    let mut text_parts = Vec::new();
    let mut thinking_parts = Vec::new();

    for block in blocks {
        match block {
            Value::String(s) => text_parts.push(s.clone()),
            Value::Object(_) => match block.get("type").and_then(Value::as_str).unwrap_or("") {
                "text" => text_parts.push(string_field(block, "text")),
                "thinking" => thinking_parts.push(string_field(block, "thinking")),
                "tool_use" => turn.tool_calls.push(ToolInvocation {
                    id: str_field(block, "id"),
                    name: block
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string(),
                    input: block
                        .get("input")
                        .cloned()
                        .unwrap_or_else(|| Value::Object(Default::default())),
                }),
                "tool_result" => turn.tool_results.push(ToolResult {
                    tool_use_id: str_field(block, "tool_use_id"),
                    is_error: block.get("is_error").and_then(Value::as_bool).unwrap_or(false),
                    content: block.get("content").cloned().unwrap_or(Value::Null),
                }),
                // image and other block kinds carry no transcript text
                _ => {}
            },
            _ => {}
        }
    }

    turn.text = text_parts.join("\n");
    turn.thinking = thinking_parts.join("\n");
    turn.tool_result_only = role == Role::User
        && !turn.tool_results.is_empty()
        && turn.text.is_empty()
        && turn.tool_calls.is_empty();
    turn
}

fn string_field(block: &Value, field: &str) -> String {
    block.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

fn agent_spawn(line: &Value) -> Option<AgentSpawn> {
    let result = line.get("toolUseResult")?;
    let agent_id = result.get("agentId").and_then(Value::as_str).filter(|id| !id.is_empty())?;
    Some(AgentSpawn {
        agent_id: agent_id.to_string(),
        description: string_field(result, "description"),
    })
}

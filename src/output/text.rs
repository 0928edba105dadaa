//! Human-readable (markdown flavoured) rendering of a session transcript.
//!
//! Consecutive assistant turns are merged under a single `### Assistant` header, thinking
//! is quoted, tool calls are summarised one per bullet, and user turns that carry tool
//! results are left out. In a batch, sub-agent logs are grouped under their parent
//! session and quoted at the point where the parent spawned them.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::{Role, SessionLog, ToolInvocation, Turn};
use crate::parsers::deserializers::parse_timestamp;
use crate::utils::terminal::strip_ansi_codes;

const QUOTE: &str = "> ";

static IDE_SELECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<ide_selection>.*?</ide_selection>").expect("valid ide_selection pattern")
});
static IDE_OPENED_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<ide_opened_file>.*?</ide_opened_file>").expect("valid ide_opened_file pattern")
});
static SYSTEM_REMINDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<system-reminder>.*?</system-reminder>").expect("valid system-reminder pattern")
});

/// Render one session as text, without sub-agent grouping
pub fn render_session(log: &SessionLog) -> String {
    render_conversation(log, &[])
}

/// Render a batch, grouping each sub-agent log under its parent session
///
/// Sessions keep their batch order. Agents whose parent is not in the batch are
/// rendered on their own.
pub fn render_sessions(logs: &[SessionLog]) -> String {
    let parents: HashSet<&str> =
        logs.iter().filter(|l| !l.is_agent).map(SessionLog::conversation_id).collect();

    let mut agents_by_parent: HashMap<&str, Vec<&SessionLog>> = HashMap::new();
    for agent in logs.iter().filter(|l| l.is_agent) {
        if parents.contains(agent.conversation_id()) {
            agents_by_parent.entry(agent.conversation_id()).or_default().push(agent);
        }
    }

    let mut documents = Vec::new();
    for log in logs {
        if !log.is_agent {
            let agents = agents_by_parent.get(log.conversation_id()).map(Vec::as_slice);
            documents.push(render_conversation(log, agents.unwrap_or_default()));
        } else if !parents.contains(log.conversation_id()) {
            documents.push(render_session(log));
        }
    }
    documents.join("\n\n")
}

fn render_conversation(log: &SessionLog, agents: &[&SessionLog]) -> String {
    let mut lines = Vec::new();

    lines.push(format!("# Conversation: {}", log.session_id));
    lines.push(String::new());
    lines.push(format!("**Session ID:** `{}`", log.conversation_id()));
    lines.push(format!("**Started:** {}", format_start(log.first_timestamp().as_deref())));
    if let Some(cwd) = &log.cwd {
        lines.push(format!("**Working Directory:** `{}`", cwd));
    }
    match &log.agent_id {
        Some(agent_id) => lines.push(format!("**Agent:** `{}`", agent_id)),
        None => lines.push(format!("**Agents spawned:** {}", agents.len())),
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    let by_id: HashMap<&str, &SessionLog> =
        agents.iter().filter_map(|agent| Some((agent.agent_key()?, *agent))).collect();
    let mut inlined: HashSet<&str> = HashSet::new();
    let mut chunk: Vec<&Turn> = Vec::new();

    for turn in log.turns() {
        chunk.push(turn);
        let Some(spawn) = &turn.spawned_agent else {
            continue;
        };
        lines.extend(format_turns(chunk.drain(..), ""));

        let agent_id = spawn.agent_id.as_str();
        if let Some(agent) = by_id.get(agent_id)
            && inlined.insert(agent_id)
        {
            lines.push(format!("{}---", QUOTE));
            lines.push(format!("{}**[Agent: {}]** {}", QUOTE, agent_id, spawn.description));
            lines.push(QUOTE.trim_end().to_string());
            lines.extend(format_turns(agent.turns(), QUOTE));
            lines.push(format!("{}**[Agent: {}]** ended", QUOTE, agent_id));
            lines.push(format!("{}---", QUOTE));
            lines.push(String::new());
        }
    }
    lines.extend(format_turns(chunk, ""));

    for agent in agents {
        let agent_id = agent.agent_key().unwrap_or(&agent.session_id);
        if inlined.contains(agent_id) {
            continue;
        }
        lines.push(format!("## Agent: {} (not inlined)", agent_id));
        lines.push(String::new());
        lines.extend(format_turns(agent.turns(), QUOTE));
    }

    lines.join("\n")
}

fn format_start(first: Option<&str>) -> String {
    match first {
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => raw.chars().take(16).collect(),
        },
        None => "unknown".to_string(),
    }
}

/// The displayable parts of one turn
struct TurnParts {
    role: Role,
    model: String,
    text: String,
    thinking: String,
    tool_calls: Vec<String>,
}

fn turn_parts(turn: &Turn) -> Option<TurnParts> {
    let carries_tool_output = turn.role == Role::User && !turn.tool_results.is_empty();
    if carries_tool_output || turn.is_empty() {
        return None;
    }
    Some(TurnParts {
        role: turn.role,
        model: turn.model.as_deref().map(short_model_name).unwrap_or_default(),
        text: clean_text(&turn.text),
        thinking: strip_ansi_codes(&turn.thinking).into_owned(),
        tool_calls: turn.tool_calls.iter().map(format_tool_call).collect(),
    })
}

/// `claude-opus-4-1` -> `opus`
fn short_model_name(model: &str) -> String {
    match model.split('-').nth(1) {
        Some(family) => family.to_string(),
        None => model.to_string(),
    }
}

fn clean_text(text: &str) -> String {
    let text = IDE_SELECTION.replace_all(text, "[IDE Selection]");
    let text = IDE_OPENED_FILE.replace_all(&text, "");
    let text = SYSTEM_REMINDER.replace_all(&text, "");
    strip_ansi_codes(text.trim()).into_owned()
}

fn input_str<'a>(input: &'a Value, field: &str) -> &'a str {
    input.get(field).and_then(Value::as_str).unwrap_or("")
}

/// One-line summary of a tool call (`TodoWrite` expands to a checklist)
pub fn format_tool_call(call: &ToolInvocation) -> String {
    let name = call.name.as_str();
    let input = &call.input;
    match name {
        "Read" | "Write" | "Edit" => format!("[{}] {}", name, input_str(input, "file_path")),
        "Glob" | "Grep" => format!("[{}] {}", name, input_str(input, "pattern")),
        "Bash" => "[Bash]".to_string(),
        "Task" => format!(
            "[Task] {} ({})",
            input_str(input, "description"),
            input_str(input, "subagent_type")
        ),
        "TodoWrite" => {
            let todos =
                input.get("todos").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
            let mut lines = vec!["[TodoWrite]".to_string()];
            for todo in todos {
                let done = todo.get("status").and_then(Value::as_str) == Some("completed");
                let checkbox = if done { "[x]" } else { "[ ]" };
                lines.push(format!("  - {} {}", checkbox, input_str(todo, "content")));
            }
            lines.join("\n")
        }
        "WebFetch" => format!("[WebFetch] {}", input_str(input, "url")),
        "WebSearch" => format!("[WebSearch] {}", input_str(input, "query")),
        _ => format!("[{}]", name),
    }
}

enum ContentItem<'a> {
    Thinking(&'a str),
    Text(&'a str),
    Tools(Vec<&'a str>),
}

/// Format turns with every non-blank line prefixed by `indent`
fn format_turns<'a>(turns: impl IntoIterator<Item = &'a Turn>, indent: &str) -> Vec<String> {
    let parts: Vec<TurnParts> = turns.into_iter().filter_map(turn_parts).collect();
    let mut lines = Vec::new();
    let mut i = 0;

    while i < parts.len() {
        match parts[i].role {
            Role::User => {
                lines.push(format!("{}### {}", indent, Role::User.label()));
                lines.push(String::new());
                if !parts[i].text.is_empty() {
                    push_lines(&mut lines, indent, &parts[i].text);
                    lines.push(String::new());
                }
                i += 1;
            }
            Role::Assistant => {
                let start = i;
                while i < parts.len() && parts[i].role == Role::Assistant {
                    i += 1;
                }
                format_assistant_group(&parts[start..i], indent, &mut lines);
            }
        }
    }

    lines
}

fn format_assistant_group(group: &[TurnParts], indent: &str, lines: &mut Vec<String>) {
    let model = group.iter().rev().map(|p| p.model.as_str()).find(|m| !m.is_empty());
    let label = Role::Assistant.label();
    match model {
        Some(model) => lines.push(format!("{}### {} ({})", indent, label, model)),
        None => lines.push(format!("{}### {}", indent, label)),
    }
    lines.push(String::new());

    let mut items: Vec<ContentItem> = Vec::new();
    for part in group {
        if !part.thinking.is_empty() {
            items.push(ContentItem::Thinking(&part.thinking));
        }
        if !part.text.is_empty() {
            items.push(ContentItem::Text(&part.text));
        }
        if !part.tool_calls.is_empty() {
            let calls = part.tool_calls.iter().map(String::as_str);
            // Consecutive tool blocks share one bullet list
            if let Some(ContentItem::Tools(existing)) = items.last_mut() {
                existing.extend(calls);
            } else {
                items.push(ContentItem::Tools(calls.collect()));
            }
        }
    }

    let thinking_indent = format!("{}{}", indent, QUOTE);
    for item in items {
        match item {
            ContentItem::Thinking(thinking) => push_lines(lines, &thinking_indent, thinking),
            ContentItem::Text(text) => push_lines(lines, indent, text),
            ContentItem::Tools(calls) => {
                for call in calls {
                    push_lines(lines, indent, &format!("- {}", call));
                }
            }
        }
        lines.push(String::new());
    }
}

fn push_lines(lines: &mut Vec<String>, prefix: &str, text: &str) {
    for line in text.split('\n') {
        lines.push(format!("{}{}", prefix, line));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::models::{ProjectPath, SessionEntry, ToolResult};

    fn turn(role: Role, text: &str) -> Turn {
        Turn {
            role,
            timestamp: None,
            uuid: None,
            model: None,
            text: text.to_string(),
            thinking: String::new(),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
            tool_result_only: false,
            spawned_agent: None,
        }
    }

    fn tool(name: &str, input: Value) -> ToolInvocation {
        ToolInvocation { id: None, name: name.to_string(), input }
    }

    fn log_with(entries: Vec<SessionEntry>) -> SessionLog {
        SessionLog {
            session_id: "abc".to_string(),
            path: PathBuf::from("abc.jsonl"),
            project: ProjectPath { raw: "-x".to_string(), decoded: "/x".to_string() },
            is_agent: false,
            agent_id: None,
            parent_session_id: Some("sess-1".to_string()),
            cwd: Some("/work".to_string()),
            entries,
            skipped_lines: 0,
        }
    }

    #[test]
    fn test_format_tool_calls() {
        assert_eq!(format_tool_call(&tool("Read", json!({"file_path": "/a.rs"}))), "[Read] /a.rs");
        assert_eq!(format_tool_call(&tool("Grep", json!({"pattern": "fn main"}))), "[Grep] fn main");
        assert_eq!(format_tool_call(&tool("Bash", json!({"command": "ls"}))), "[Bash]");
        assert_eq!(
            format_tool_call(&tool("Task", json!({"description": "Explore", "subagent_type": "Plan"}))),
            "[Task] Explore (Plan)"
        );
        assert_eq!(
            format_tool_call(&tool("WebFetch", json!({"url": "https://x.dev"}))),
            "[WebFetch] https://x.dev"
        );
        assert_eq!(format_tool_call(&tool("mcp__custom", json!({}))), "[mcp__custom]");
    }

    #[test]
    fn test_format_todo_write() {
        let call = tool(
            "TodoWrite",
            json!({"todos": [
                {"content": "Write tests", "status": "completed"},
                {"content": "Ship", "status": "pending"}
            ]}),
        );
        assert_eq!(format_tool_call(&call), "[TodoWrite]\n  - [x] Write tests\n  - [ ] Ship");
        assert_eq!(format_tool_call(&tool("TodoWrite", json!({}))), "[TodoWrite]");
    }

    #[test]
    fn test_render_merges_consecutive_assistant_turns() {
        let mut first = turn(Role::Assistant, "Let me look.");
        first.model = Some("claude-sonnet-4-5".to_string());
        first.thinking = "Need the file".to_string();
        first.tool_calls.push(tool("Read", json!({"file_path": "/a"})));

        let mut tool_output = turn(Role::User, "");
        tool_output.tool_results.push(ToolResult {
            tool_use_id: None,
            is_error: false,
            content: json!("..."),
        });
        tool_output.tool_result_only = true;

        let mut second = turn(Role::Assistant, "");
        second.tool_calls.push(tool("Edit", json!({"file_path": "/a"})));

        let log = log_with(vec![
            SessionEntry::User(turn(Role::User, "fix it")),
            SessionEntry::Assistant(first),
            SessionEntry::User(tool_output),
            SessionEntry::Assistant(second),
            SessionEntry::Assistant(turn(Role::Assistant, "Done.")),
        ]);

        let rendered = render_session(&log);
        let body = rendered.split("---\n\n").nth(1).unwrap();
        assert_eq!(
            body,
            "### User\n\nfix it\n\n### Assistant (sonnet)\n\n> Need the file\n\nLet me look.\n\n- [Read] /a\n- [Edit] /a\n\nDone.\n"
        );
        assert!(rendered.starts_with("# Conversation: abc\n\n**Session ID:** `sess-1`"));
        assert!(rendered.contains("**Working Directory:** `/work`"));
    }

    #[test]
    fn test_render_cleans_ide_markup() {
        let text = "<ide_selection>lots\nof code</ide_selection> explain <system-reminder>x</system-reminder><ide_opened_file>f</ide_opened_file>";
        let log = log_with(vec![SessionEntry::User(turn(Role::User, text))]);
        let rendered = render_session(&log);
        assert!(rendered.contains("[IDE Selection] explain"));
        assert!(!rendered.contains("system-reminder"));
        assert!(!rendered.contains("ide_opened_file"));
    }

    #[test]
    fn test_start_time_formatting() {
        assert_eq!(format_start(Some("2025-11-02T09:41:20.016Z")), "2025-11-02 09:41");
        assert_eq!(format_start(Some("T1")), "T1");
        assert_eq!(format_start(None), "unknown");
    }

    #[test]
    fn test_short_model_name() {
        assert_eq!(short_model_name("claude-opus-4-1"), "opus");
        assert_eq!(short_model_name("gpt5"), "gpt5");
    }
}

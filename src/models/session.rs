use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ProjectPath;
use crate::parsers::deserializers::{deserialize_raw_timestamp, raw_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A `tool_use` content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub input: Value,
}

/// A `tool_result` content block, as carried by user entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_id: Option<String>,
    #[serde(default)]
    pub is_error: bool,
    pub content: Value,
}

/// Sub-agent launched by the tool call a user entry answers (`toolUseResult.agentId`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpawn {
    pub agent_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// One user or assistant turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_raw_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thinking: String,
    pub tool_calls: Vec<ToolInvocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<ToolResult>,
    /// User turn that only returns tool output to the assistant
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tool_result_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned_agent: Option<AgentSpawn>,
}

impl Turn {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.thinking.is_empty() && self.tool_calls.is_empty()
    }
}

/// One classified line of a session log
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEntry {
    User(Turn),
    Assistant(Turn),
    FileHistorySnapshot(Value),
    QueueOperation(Value),
    /// Any entry type not modelled above (`summary`, `system`, ...), kept verbatim
    Other { entry_type: String, raw: Value },
}

impl SessionEntry {
    pub fn as_turn(&self) -> Option<&Turn> {
        match self {
            SessionEntry::User(turn) | SessionEntry::Assistant(turn) => Some(turn),
            _ => None,
        }
    }
}

/// Non-conversation entries of a session, grouped by kind in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Auxiliary {
    pub file_history_snapshots: Vec<Value>,
    pub queue_operations: Vec<Value>,
    pub other: Vec<Value>,
}

/// A parsed session log file
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLog {
    pub session_id: String,
    pub path: PathBuf,
    pub project: ProjectPath,
    /// Sub-agent log (`agent-*.jsonl`)
    pub is_agent: bool,
    pub agent_id: Option<String>,
    /// `sessionId` recorded inside the entries; for sub-agents this is the parent session
    pub parent_session_id: Option<String>,
    pub cwd: Option<String>,
    pub entries: Vec<SessionEntry>,
    pub skipped_lines: usize,
}

impl SessionLog {
    /// User and assistant turns in file order
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.entries.iter().filter_map(SessionEntry::as_turn)
    }

    pub fn auxiliary(&self) -> Auxiliary {
        let mut aux = Auxiliary::default();
        for entry in &self.entries {
            match entry {
                SessionEntry::FileHistorySnapshot(raw) => {
                    aux.file_history_snapshots.push(raw.clone())
                }
                SessionEntry::QueueOperation(raw) => aux.queue_operations.push(raw.clone()),
                SessionEntry::Other { raw, .. } => aux.other.push(raw.clone()),
                SessionEntry::User(_) | SessionEntry::Assistant(_) => {}
            }
        }
        aux
    }

    pub fn transcript(&self) -> ConversationTranscript<'_> {
        ConversationTranscript { turns: self.turns().collect(), auxiliary: self.auxiliary() }
    }

    /// Timestamp of the first entry that has one, auxiliary entries included
    pub fn first_timestamp(&self) -> Option<String> {
        self.entries.iter().find_map(|entry| {
            let ts = match entry {
                SessionEntry::User(turn) | SessionEntry::Assistant(turn) => turn.timestamp.clone(),
                SessionEntry::FileHistorySnapshot(raw)
                | SessionEntry::QueueOperation(raw)
                | SessionEntry::Other { raw, .. } => raw.get("timestamp").and_then(raw_timestamp),
            }?;
            (!ts.is_empty()).then_some(ts)
        })
    }

    /// Conversation this log belongs to: the recorded `sessionId`, else the file stem
    ///
    /// Sub-agent logs record their parent's `sessionId`, so they share its id.
    pub fn conversation_id(&self) -> &str {
        self.parent_session_id.as_deref().unwrap_or(&self.session_id)
    }

    /// Id of a sub-agent log, from `agentId` or the `agent-<id>` file stem
    pub fn agent_key(&self) -> Option<&str> {
        if !self.is_agent {
            return None;
        }
        self.agent_id.as_deref().or_else(|| self.session_id.strip_prefix("agent-"))
    }
}

/// The conversation view over a [`SessionLog`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTranscript<'a> {
    pub turns: Vec<&'a Turn>,
    pub auxiliary: Auxiliary,
}

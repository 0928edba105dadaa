use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Auxiliary, ProjectPath, SessionLog, Turn};

/// Output document for one session
#[derive(Debug, Serialize)]
pub struct SessionDocument<'a> {
    pub session_id: &'a str,
    pub path: String,
    pub project: &'a ProjectPath,
    pub is_agent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<&'a str>,
    pub messages: Vec<&'a Turn>,
    pub auxiliary: Auxiliary,
    pub skipped_lines: usize,
}

impl<'a> SessionDocument<'a> {
    pub fn new(log: &'a SessionLog) -> Self {
        let transcript = log.transcript();
        Self {
            session_id: &log.session_id,
            path: display_path(&log.path),
            project: &log.project,
            is_agent: log.is_agent,
            agent_id: log.agent_id.as_deref(),
            parent_session_id: log.parent_session_id.as_deref(),
            cwd: log.cwd.as_deref(),
            messages: transcript.turns,
            auxiliary: transcript.auxiliary,
            skipped_lines: log.skipped_lines,
        }
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Serialize compactly or with two-space indentation
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json =
        if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    json.context("Failed to serialize output")
}

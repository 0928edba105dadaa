//! Serialization of extraction results to JSON or text, and delivery to stdout or a file

pub mod json;
pub mod text;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::models::{OriginExtraction, SessionLog};

pub use json::{SessionDocument, to_json};
pub use text::{format_tool_call, render_session, render_sessions};

/// Session output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    #[default]
    Json,
    /// JSON indented with two spaces
    Pretty,
    /// Markdown-flavoured transcript
    Text,
}

/// Render IndexedDB results as a JSON array, one element per origin
pub fn render_origins(origins: &[OriginExtraction], pretty: bool) -> Result<String> {
    to_json(origins, pretty)
}

/// Render one session in the requested format
pub fn render_session_log(log: &SessionLog, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_session(log)),
        OutputFormat::Json => to_json(&SessionDocument::new(log), false),
        OutputFormat::Pretty => to_json(&SessionDocument::new(log), true),
    }
}

/// Render a batch of sessions; JSON formats produce an array
pub fn render_session_logs(logs: &[SessionLog], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Text {
        return Ok(render_sessions(logs));
    }
    let documents: Vec<SessionDocument> = logs.iter().map(SessionDocument::new).collect();
    to_json(&documents, format == OutputFormat::Pretty)
}

/// Write rendered output to `path`, or to stdout when `None`
///
/// Parent directories of `path` are created as needed. A trailing newline is added.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, format!("{}\n", content))
                .with_context(|| format!("Failed to write output file: {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", content).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}

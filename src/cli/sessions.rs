use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::cli::commands::{CopySessionsArgs, ExtractSessionsArgs, SessionSelection};
use crate::discovery::{discover_projects, find_project};
use crate::models::{ProjectInfo, SessionLog};
use crate::output::{render_session_log, render_session_logs, write_output};
use crate::parsers::parse_session_file;
use crate::utils::{format_path_with_tilde, get_projects_dir};

fn projects_dir(selection: &SessionSelection) -> Result<PathBuf> {
    match &selection.claude_dir {
        Some(dir) => Ok(dir.join("projects")),
        None => get_projects_dir(),
    }
}

/// Projects named by the selection, or all of them
fn selected_projects(selection: &SessionSelection) -> Result<Vec<ProjectInfo>> {
    let projects_dir = projects_dir(selection)?;
    let projects = match &selection.project {
        Some(project) => vec![find_project(&projects_dir, project)?],
        None => discover_projects(&projects_dir)?,
    };
    if projects.iter().all(|p| p.session_files.is_empty()) {
        eprintln!("No session logs found in {}", format_path_with_tilde(&projects_dir));
    }
    Ok(projects)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
}

/// `sessions list`: one `project_dir/file.jsonl` line per session log
pub fn list(selection: &SessionSelection) -> Result<()> {
    for project in selected_projects(selection)? {
        for file in &project.session_files {
            println!("{}/{}", project.project.raw, file_name(file));
        }
    }
    Ok(())
}

/// `sessions extract`: parse one file, or every selected session as an array
pub fn extract(args: &ExtractSessionsArgs) -> Result<()> {
    let rendered = match &args.file {
        Some(file) => {
            if !file.is_file() {
                bail!("Session file not found: {}", file.display());
            }
            let log = parse_session_file(file)?;
            render_session_log(&log, args.format)?
        }
        None => {
            let mut logs = parse_all(&selected_projects(&args.selection)?);
            if let Some(filter) = &args.session {
                logs.retain(|log| log.conversation_id().contains(filter.as_str()));
            }
            render_session_logs(&logs, args.format)?
        }
    };

    write_output(&rendered, args.output.as_deref())?;
    if let Some(output) = &args.output {
        eprintln!("Wrote {}", output.display());
    }
    Ok(())
}

fn parse_all(projects: &[ProjectInfo]) -> Vec<SessionLog> {
    let mut logs = Vec::new();
    let mut failed = 0;

    for file in projects.iter().flat_map(|p| &p.session_files) {
        match parse_session_file(file) {
            Ok(log) => logs.push(log),
            Err(e) => {
                warn!("{:#}", e);
                failed += 1;
            }
        }
    }

    let skipped: usize = logs.iter().map(|l| l.skipped_lines).sum();
    eprintln!(
        "Parsed {} session(s): {} failed, {} line(s) skipped",
        logs.len(),
        failed,
        skipped
    );
    logs
}

/// `sessions copy`: copy raw logs to `<output>/<project_dir>_<file>`
pub fn copy(args: &CopySessionsArgs) -> Result<()> {
    let projects = selected_projects(&args.selection)?;
    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory: {}", args.output.display()))?;

    let mut copied = 0;
    let mut failed = 0;
    for project in &projects {
        for file in &project.session_files {
            let name = format!("{}_{}", project.project.raw, file_name(file));
            let dest = args.output.join(&name);
            match fs::copy(file, &dest) {
                Ok(_) => {
                    println!("Copied: {}", name);
                    copied += 1;
                }
                Err(e) => {
                    warn!("Failed to copy {} to {}: {}", file.display(), dest.display(), e);
                    failed += 1;
                }
            }
        }
    }

    eprintln!(
        "Copied {} session file(s) to {}, {} failed",
        copied,
        args.output.display(),
        failed
    );
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::models::ProjectInfo;
use crate::utils::{decode_project_dir, encode_project_dir, encode_project_dir_strict};

const SESSION_EXTENSION: &str = "jsonl";

/// Discover all projects in ~/.claude/projects/ and their session logs
///
/// Scans the projects directory for project subdirectories, decoding their names back to
/// file system paths (best effort) and collecting every `*.jsonl` session file, including
/// `agent-*.jsonl` sub-agent logs. Projects and files are sorted by name.
///
/// # Arguments
///
/// * `projects_dir` - Path to the ~/.claude/projects directory
///
/// # Returns
///
/// Returns an empty Vec if the projects directory doesn't exist (not an error).
///
/// # Errors
///
/// Returns an error if the projects directory exists but cannot be read. Individual
/// project directories that cannot be read are logged as warnings and skipped.
pub fn discover_projects(projects_dir: &Path) -> Result<Vec<ProjectInfo>> {
    if !projects_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(projects_dir)
        .with_context(|| format!("Failed to read projects directory: {}", projects_dir.display()))?;

    let mut projects = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        match read_project(&path) {
            Ok(project) => projects.push(project),
            Err(e) => warn!("Skipping project directory {}: {:#}", path.display(), e),
        }
    }

    projects.sort_by(|a, b| a.project.raw.cmp(&b.project.raw));
    Ok(projects)
}

/// Find the project directory for a project path such as `/Users/me/app`
///
/// Tries the separator-only encoding first, then the encoding that replaces every
/// non-alphanumeric character.
///
/// # Errors
///
/// Returns an error if no matching project directory exists.
pub fn find_project(projects_dir: &Path, project_path: &str) -> Result<ProjectInfo> {
    let candidates = [encode_project_dir(project_path), encode_project_dir_strict(project_path)];
    for name in &candidates {
        let dir = projects_dir.join(name);
        if dir.is_dir() {
            return read_project(&dir);
        }
    }
    bail!(
        "Project not found: {} (looked in {})",
        project_path,
        projects_dir.join(&candidates[0]).display()
    )
}

/// Every session file across the given projects, in project order
pub fn session_files(projects: &[ProjectInfo]) -> Vec<PathBuf> {
    projects.iter().flat_map(|p| p.session_files.iter().cloned()).collect()
}

fn read_project(dir: &Path) -> Result<ProjectInfo> {
    let dir_name = dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();

    let mut session_files = Vec::new();
    let files = fs::read_dir(dir)
        .with_context(|| format!("Failed to read project directory: {}", dir.display()))?;
    for file in files.flatten() {
        let file_path = file.path();
        if file_path.is_file()
            && file_path.extension().is_some_and(|ext| ext == SESSION_EXTENSION)
        {
            session_files.push(file_path);
        }
    }
    session_files.sort();

    Ok(ProjectInfo {
        project: decode_project_dir(&dir_name),
        project_dir: dir.to_path_buf(),
        session_files,
    })
}

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Get the Claude directory path (~/.claude)
pub fn get_claude_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".claude"))
}

/// Get the Claude Code session root (~/.claude/projects)
pub fn get_projects_dir() -> Result<PathBuf> {
    Ok(get_claude_dir()?.join("projects"))
}

/// Get the default Chrome user-data directory for the current platform
///
/// - macOS: `~/Library/Application Support/Google/Chrome`
/// - Windows: `%LOCALAPPDATA%\Google\Chrome\User Data`
/// - Linux: `~/.config/google-chrome`
pub fn get_default_chrome_dir() -> Result<PathBuf> {
    if cfg!(target_os = "macos") {
        let data = dirs::data_dir().context("Failed to determine application support directory")?;
        Ok(data.join("Google").join("Chrome"))
    } else if cfg!(target_os = "windows") {
        let local = dirs::data_local_dir().context("Failed to determine LOCALAPPDATA")?;
        Ok(local.join("Google").join("Chrome").join("User Data"))
    } else {
        let config = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config.join("google-chrome"))
    }
}

use std::borrow::Cow;
use std::env;
use std::path::Path;

use percent_encoding::percent_decode_str;

use crate::models::ProjectPath;

/// Encodes a project path into Claude's project directory name
///
/// Path separators become `-` and the result always starts with `-`.
///
/// # Examples
///
/// ```
/// use artifact_extractor::encode_project_dir;
///
/// assert_eq!(encode_project_dir("/Users/foo/bar"), "-Users-foo-bar");
/// ```
pub fn encode_project_dir(path: &str) -> String {
    let encoded = path.replace(['/', '\\'], "-");
    if encoded.starts_with('-') { encoded } else { format!("-{}", encoded) }
}

/// Alternative encoding where every non-alphanumeric character becomes `-`
///
/// Newer Claude Code releases also replace `.`, `_` and spaces, so lookups try both forms.
pub fn encode_project_dir_strict(path: &str) -> String {
    let encoded: String =
        path.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '-' }).collect();
    if encoded.starts_with('-') { encoded } else { format!("-{}", encoded) }
}

/// Decodes a project directory name back to a path, best effort
///
/// Separators and literal dashes share the same placeholder, so `-Users-foo-my-app`
/// decodes to `/Users/foo/my/app` even if the original was `/Users/foo/my-app`.
/// The raw name is always returned alongside the guess. Names in the legacy
/// percent-encoded form (`-Users%2Ffoo`) are percent-decoded instead.
///
/// # Examples
///
/// ```
/// use artifact_extractor::decode_project_dir;
///
/// let project = decode_project_dir("-Users-foo-bar");
/// assert_eq!(project.decoded, "/Users/foo/bar");
/// assert_eq!(project.raw, "-Users-foo-bar");
/// ```
pub fn decode_project_dir(dir_name: &str) -> ProjectPath {
    let without_prefix = dir_name.strip_prefix('-').unwrap_or(dir_name);

    let decoded = if is_percent_encoded(without_prefix) {
        let decoded = percent_decode_str(without_prefix).decode_utf8_lossy();
        let decoded_str = match decoded {
            Cow::Borrowed(s) => s.to_string(),
            Cow::Owned(s) => s,
        };
        format!("/{}", decoded_str)
    } else {
        format!("/{}", without_prefix.replace('-', "/"))
    };

    ProjectPath { raw: dir_name.to_string(), decoded }
}

fn is_percent_encoded(name: &str) -> bool {
    name.contains("%2F") || name.contains("%2f")
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use artifact_extractor::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/.claude");
/// // Returns "~/.claude" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

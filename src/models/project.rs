use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Best-effort decoding of a Claude project directory name.
///
/// The directory name replaces path separators with `-`, so a real `-` in the original
/// path cannot be told apart from a separator. `decoded` is a guess; `raw` is always
/// the untouched directory name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPath {
    pub raw: String,
    pub decoded: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub project: ProjectPath,
    pub project_dir: PathBuf,
    pub session_files: Vec<PathBuf>,
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One browser user profile (`Default`, `Profile 8`, ...) under the user-data root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRef {
    pub name: String,
    pub path: PathBuf,
}

/// One per-origin IndexedDB directory (`<origin>_<n>.indexeddb.leveldb`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginStore {
    pub origin: String,
    pub path: PathBuf,
    /// Name of the owning profile, for display only. `None` for direct `--path` invocations.
    pub profile: Option<String>,
}

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::models::{OriginStore, ProfileRef};

pub const INDEXEDDB_DIR: &str = "IndexedDB";
pub const LEVELDB_SUFFIX: &str = ".indexeddb.leveldb";
pub const BLOB_SUFFIX: &str = ".indexeddb.blob";

const DEFAULT_PROFILE: &str = "Default";
const GUEST_PROFILE: &str = "Guest Profile";
const NUMBERED_PROFILE_PREFIX: &str = "Profile ";

/// Whether a directory name under the user-data root is a profile
///
/// Accepts `Default`, `Guest Profile`, and `Profile <n>` for a positive integer `n`.
pub fn is_profile_dir_name(name: &str) -> bool {
    if name == DEFAULT_PROFILE || name == GUEST_PROFILE {
        return true;
    }
    match name.strip_prefix(NUMBERED_PROFILE_PREFIX) {
        Some(n) => {
            !n.is_empty()
                && n.bytes().all(|b| b.is_ascii_digit())
                && n.parse::<u64>().is_ok_and(|n| n > 0)
        }
        None => false,
    }
}

/// Discover profiles under a browser user-data root
///
/// Profiles are returned in directory listing order. A missing or unreadable root
/// yields an empty Vec.
pub fn discover_profiles(user_data_root: &Path) -> Vec<ProfileRef> {
    let entries = match fs::read_dir(user_data_root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read user data root {}: {}", user_data_root.display(), e);
            return Vec::new();
        }
    };

    let mut profiles = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if is_profile_dir_name(&name) {
            profiles.push(ProfileRef { name, path });
        }
    }

    profiles
}

/// Look up one profile by directory name
pub fn find_profile(user_data_root: &Path, name: &str) -> Option<ProfileRef> {
    let path = user_data_root.join(name);
    path.is_dir().then(|| ProfileRef { name: name.to_string(), path })
}

/// Origin identifier for an IndexedDB directory name (suffix stripped)
pub fn origin_id(dir_name: &str) -> String {
    dir_name.strip_suffix(LEVELDB_SUFFIX).unwrap_or(dir_name).to_string()
}

/// A LevelDB directory always has a `CURRENT` file or a `MANIFEST-*` file
pub fn has_engine_markers(path: &Path) -> bool {
    if path.join("CURRENT").is_file() {
        return true;
    }
    fs::read_dir(path)
        .map(|entries| {
            entries
                .flatten()
                .any(|e| e.file_name().to_string_lossy().starts_with("MANIFEST-"))
        })
        .unwrap_or(false)
}

/// Discover the per-origin IndexedDB directories of one profile
///
/// Only `*.indexeddb.leveldb` directories containing LevelDB marker files are returned;
/// `*.indexeddb.blob` siblings and directories failing the marker check are skipped.
pub fn discover_origins(profile: &ProfileRef) -> Vec<OriginStore> {
    let idb_dir = profile.path.join(INDEXEDDB_DIR);
    let entries = match fs::read_dir(&idb_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No IndexedDB directory for profile {}: {}", profile.name, e);
            return Vec::new();
        }
    };

    let mut origins = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if name.ends_with(BLOB_SUFFIX) {
            debug!("Skipping blob directory {}", path.display());
            continue;
        }
        if !name.ends_with(LEVELDB_SUFFIX) || !path.is_dir() {
            continue;
        }
        if !has_engine_markers(&path) {
            warn!("Skipping {}: no LevelDB CURRENT or MANIFEST file", path.display());
            continue;
        }

        origins.push(OriginStore {
            origin: origin_id(&name),
            path,
            profile: Some(profile.name.clone()),
        });
    }

    origins
}

/// Discover origins across every profile, or only `profile` when given
pub fn discover_all_origins(user_data_root: &Path, profile: Option<&str>) -> Vec<OriginStore> {
    let profiles: Vec<ProfileRef> = match profile {
        Some(name) => find_profile(user_data_root, name).into_iter().collect(),
        None => discover_profiles(user_data_root),
    };
    profiles.iter().flat_map(discover_origins).collect()
}

/// Treat an explicit path as a single origin store, bypassing discovery
///
/// Only existence is checked.
pub fn origin_from_path(path: &Path) -> ExtractResult<OriginStore> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    Ok(OriginStore { origin: origin_id(&name), path: path.to_path_buf(), profile: None })
}

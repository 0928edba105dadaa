//! Discovery of extraction inputs
//!
//! - [`profiles`]: browser profiles under a user-data root and the per-origin IndexedDB
//!   directories inside each profile
//! - [`sessions`]: Claude Code project directories and their session logs
//!
//! Both treat a missing root as an empty result. Unreadable or malformed individual
//! entries are logged and skipped rather than failing the whole discovery.

pub mod profiles;
pub mod sessions;

pub use profiles::{
    discover_all_origins, discover_origins, discover_profiles, find_profile, origin_from_path,
};
pub use sessions::{discover_projects, find_project, session_files};

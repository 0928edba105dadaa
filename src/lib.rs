//! Artifact Extractor - pull local application artifacts into structured JSON
//!
//! This library reads two kinds of on-disk artifacts without modifying them:
//!
//! - Chromium IndexedDB stores: discovering profiles and per-origin directories,
//!   optionally copying each store aside before reading, and normalizing decoded
//!   records (binary, dates, compound keys) into JSON
//! - Claude Code session logs under `~/.claude/projects/`: classifying every JSONL
//!   line in file order and reconstructing the conversation transcript
//!
//! The binary on-disk IndexedDB decode is delegated to a [`DecodeBackend`].
//!
//! # Example
//!
//! ```no_run
//! use artifact_extractor::{discover_projects, get_projects_dir, parse_session_file};
//!
//! let projects = discover_projects(&get_projects_dir()?)?;
//! for project in &projects {
//!     for file in &project.session_files {
//!         let log = parse_session_file(file)?;
//!         println!("{}: {} turns", log.session_id, log.turns().count());
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod discovery;
pub mod error;
pub mod indexeddb;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use discovery::{
    discover_all_origins, discover_origins, discover_profiles, discover_projects, find_project,
    origin_from_path,
};
pub use error::{ExtractError, ExtractResult};
pub use indexeddb::{DecodeBackend, ExtractOptions, OpenedStore, extract_origin, normalize};
pub use models::{OriginExtraction, SessionLog};
pub use parsers::parse_session_file;
pub use utils::paths::{decode_project_dir, encode_project_dir, format_path_with_tilde};
pub use utils::{get_default_chrome_dir, get_projects_dir};

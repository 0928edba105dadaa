//! JSONL parser for Claude Code session logs
//!
//! # Error Handling Strategy
//!
//! Session logs are forensic input, so parsing never gives up on a file because of its
//! contents:
//!
//! - **Individual line failures**: Non-JSON lines and lines without a string `type` are
//!   counted in `SessionLog::skipped_lines`, logged at debug level, and skipped.
//!
//! - **Odd field types**: A `user`/`assistant` line always becomes a turn. Fields of an
//!   unexpected JSON type (`"content": null`, a numeric `uuid`) read as absent.
//!
//! - **Unknown entry types**: Kept verbatim as `SessionEntry::Other`, never dropped.
//!
//! - **I/O failures**: Opening or reading the file fails the whole session with an
//!   `anyhow` error; batch callers report it and move on to the next session.

pub mod deserializers;
pub mod session;

pub use session::{parse_session_file, parse_session_lines};

//! Data models for both extraction paths.
//!
//! - [`ProfileRef`] / [`OriginStore`] - browser profiles and per-origin IndexedDB directories
//! - [`RawValue`] / [`RawRecord`] - values as yielded by a decode backend
//! - [`OriginExtraction`] and children - normalized IndexedDB output
//! - [`SessionLog`] / [`SessionEntry`] / [`Turn`] - parsed Claude Code session logs
//! - [`ProjectPath`] / [`ProjectInfo`] - discovered session project directories

pub mod indexeddb;
pub mod profile;
pub mod project;
pub mod session;

pub use indexeddb::{
    DatabaseExtraction, DatabaseId, ObjectStoreExtraction, OriginExtraction, RawRecord, RawValue,
    Record, RecordState,
};
pub use profile::{OriginStore, ProfileRef};
pub use project::{ProjectInfo, ProjectPath};
pub use session::{
    AgentSpawn, Auxiliary, ConversationTranscript, Role, SessionEntry, SessionLog, ToolInvocation,
    ToolResult, Turn,
};

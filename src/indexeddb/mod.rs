//! IndexedDB extraction: safe acquisition, decoding through a pluggable backend, and
//! normalization of decoded values into JSON.
//!
//! # Error Handling Strategy
//!
//! Each origin is one unit of work and extraction of it is total:
//!
//! - **Acquisition failures** (safe copy could not be made) and **open failures** (the
//!   backend cannot read the directory) end that origin only and are recorded in its
//!   `error` field.
//! - **Object store failures** are recorded on the object store; sibling stores continue.
//! - **Record failures** are logged with `tracing::warn!`, counted in `skipped`, and the
//!   iteration continues with the next record.

pub mod acquisition;
pub mod backend;
pub mod extract;
pub mod memory;
pub mod normalize;

pub use acquisition::{Acquired, acquire, with_acquired};
pub use backend::{DecodeBackend, OpenedStore, RecordIter, UnavailableBackend};
pub use extract::{ExtractOptions, extract_origin, list_database_names};
pub use normalize::{BINARY_MARKER, normalize};

//! Seam between the extractor and whatever decodes the on-disk LevelDB/IndexedDB format.

use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::models::{DatabaseId, RawRecord};

/// Lazy, single-pass sequence of records from one object store
pub type RecordIter<'a> = Box<dyn Iterator<Item = ExtractResult<RawRecord>> + 'a>;

/// Opens an acquired IndexedDB directory for reading
pub trait DecodeBackend {
    /// Fails with [`ExtractError::DecodeFatal`] when the directory cannot be read at all
    fn open(&self, path: &Path) -> ExtractResult<Box<dyn OpenedStore>>;
}

/// An opened origin directory
pub trait OpenedStore {
    fn databases(&self) -> Vec<DatabaseId>;

    fn object_store_names(&self, db: &DatabaseId) -> ExtractResult<Vec<String>>;

    /// Per-record decode failures are yielded as `Err` items; the iterator keeps going.
    fn records<'a>(&'a self, db: &DatabaseId, store: &str) -> ExtractResult<RecordIter<'a>>;
}

/// Backend used when no decoder is compiled in: every open fails with a clear message
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl DecodeBackend for UnavailableBackend {
    fn open(&self, path: &Path) -> ExtractResult<Box<dyn OpenedStore>> {
        Err(ExtractError::decode_fatal(
            path,
            "no IndexedDB decoder is available in this build; plug a DecodeBackend into the library",
        ))
    }
}

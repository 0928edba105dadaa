//! In-memory [`DecodeBackend`] for tests and for embedding pre-decoded data.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, ExtractResult};
use crate::indexeddb::backend::{DecodeBackend, OpenedStore, RecordIter};
use crate::models::{DatabaseId, RawRecord};

#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    pub name: String,
    /// `Err` entries simulate records the decoder cannot read
    pub records: Vec<Result<RawRecord, String>>,
}

#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    pub id: DatabaseId,
    pub object_stores: Vec<MemoryObjectStore>,
}

#[derive(Debug, Clone)]
struct MemoryStore {
    databases: Vec<MemoryDatabase>,
}

/// Serves the same databases for every path it is asked to open
#[derive(Debug, Default)]
pub struct MemoryBackend {
    databases: Vec<MemoryDatabase>,
    open_error: Option<String>,
    /// Paths passed to `open`, in call order
    opened: RefCell<Vec<PathBuf>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, database: MemoryDatabase) -> Self {
        self.databases.push(database);
        self
    }

    /// Make every `open` fail with the given message
    pub fn failing(message: &str) -> Self {
        Self { open_error: Some(message.to_string()), ..Self::default() }
    }

    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.opened.borrow().clone()
    }
}

impl MemoryDatabase {
    pub fn new(name: &str, id: u64, origin: &str) -> Self {
        Self {
            id: DatabaseId { name: name.to_string(), id, origin: origin.to_string() },
            object_stores: Vec::new(),
        }
    }

    pub fn with_store(mut self, name: &str, records: Vec<Result<RawRecord, String>>) -> Self {
        self.object_stores.push(MemoryObjectStore { name: name.to_string(), records });
        self
    }
}

impl DecodeBackend for MemoryBackend {
    fn open(&self, path: &Path) -> ExtractResult<Box<dyn OpenedStore>> {
        self.opened.borrow_mut().push(path.to_path_buf());
        if let Some(message) = &self.open_error {
            return Err(ExtractError::decode_fatal(path, message.clone()));
        }
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        Ok(Box::new(MemoryStore { databases: self.databases.clone() }))
    }
}

impl MemoryStore {
    fn database(&self, db: &DatabaseId) -> ExtractResult<&MemoryDatabase> {
        self.databases.iter().find(|d| d.id == *db).ok_or_else(|| {
            ExtractError::decode_fatal(PathBuf::new(), format!("unknown database {}", db.name))
        })
    }
}

impl OpenedStore for MemoryStore {
    fn databases(&self) -> Vec<DatabaseId> {
        self.databases.iter().map(|d| d.id.clone()).collect()
    }

    fn object_store_names(&self, db: &DatabaseId) -> ExtractResult<Vec<String>> {
        Ok(self.database(db)?.object_stores.iter().map(|s| s.name.clone()).collect())
    }

    fn records<'a>(&'a self, db: &DatabaseId, store: &str) -> ExtractResult<RecordIter<'a>> {
        let store = self
            .database(db)?
            .object_stores
            .iter()
            .find(|s| s.name == store)
            .ok_or_else(|| {
                let message = format!("unknown object store {}", store);
                ExtractError::decode_fatal(PathBuf::new(), message)
            })?;

        Ok(Box::new(store.records.iter().map(|record| match record {
            Ok(record) => Ok(record.clone()),
            Err(message) => Err(ExtractError::record_failed(None, message.clone())),
        })))
    }
}

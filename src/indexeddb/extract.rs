use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::indexeddb::acquisition::with_acquired;
use crate::indexeddb::backend::{DecodeBackend, OpenedStore};
use crate::indexeddb::normalize::normalize;
use crate::models::{
    DatabaseExtraction, DatabaseId, ObjectStoreExtraction, OriginExtraction, OriginStore, Record,
    RecordState,
};

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Copy the store to a temporary directory before reading
    pub safe_copy: bool,
    pub include_deleted: bool,
    /// Parent directory for safe copies; system temp dir when `None`
    pub temp_root: Option<PathBuf>,
}

/// Extract every database and object store of one origin directory
///
/// Never fails: acquisition and open failures are reported in
/// [`OriginExtraction::error`], database and object-store failures in their own
/// `error` fields, and unreadable records are counted in `skipped`.
pub fn extract_origin(
    store: &OriginStore,
    backend: &dyn DecodeBackend,
    options: &ExtractOptions,
) -> OriginExtraction {
    let mut result = OriginExtraction {
        path: store.path.to_string_lossy().to_string(),
        origin: store.origin.clone(),
        profile: store.profile.clone(),
        databases: Vec::new(),
        error: None,
    };

    let outcome = with_acquired(
        &store.path,
        options.safe_copy,
        options.temp_root.as_deref(),
        |path| -> Result<Vec<DatabaseExtraction>, ExtractError> {
            let opened = backend.open(path)?;
            Ok(opened
                .databases()
                .iter()
                .map(|db| extract_database(opened.as_ref(), db, options))
                .collect())
        },
    );

    match outcome {
        Ok(Ok(databases)) => result.databases = databases,
        Ok(Err(e)) | Err(e) => {
            if e.is_acquisition() {
                warn!("Origin {} left unread: {}", store.origin, e);
            } else {
                warn!("Origin {} could not be decoded: {}", store.origin, e);
            }
            result.error = Some(e.to_string());
        }
    }

    result
}

fn extract_database(
    opened: &dyn OpenedStore,
    db: &DatabaseId,
    options: &ExtractOptions,
) -> DatabaseExtraction {
    let mut result = DatabaseExtraction {
        name: db.name.clone(),
        id: db.id,
        origin: db.origin.clone(),
        object_stores: Vec::new(),
        error: None,
    };

    match opened.object_store_names(db) {
        Ok(names) => {
            result.object_stores =
                names.iter().map(|name| extract_object_store(opened, db, name, options)).collect();
        }
        Err(e) => {
            warn!("Failed to list object stores of database {}: {}", db.name, e);
            result.error = Some(e.to_string());
        }
    }

    result
}

/// Single pass over one object store's records
fn extract_object_store(
    opened: &dyn OpenedStore,
    db: &DatabaseId,
    name: &str,
    options: &ExtractOptions,
) -> ObjectStoreExtraction {
    let mut result = ObjectStoreExtraction {
        name: name.to_string(),
        records: Vec::new(),
        skipped: 0,
        error: None,
    };

    let records = match opened.records(db, name) {
        Ok(records) => records,
        Err(e) => {
            warn!("Failed to read object store {}/{}: {}", db.name, name, e);
            result.error = Some(e.to_string());
            return result;
        }
    };

    for record in records {
        match record {
            Ok(record) => {
                if record.state == Some(RecordState::Deleted) && !options.include_deleted {
                    continue;
                }
                result.records.push(Record {
                    key: normalize(&record.key),
                    value: normalize(&record.value),
                    state: record.state,
                });
            }
            Err(e) => {
                warn!("Skipping record in {}/{}: {}", db.name, name, e);
                result.skipped += 1;
            }
        }
    }

    debug!(
        "Object store {}/{}: {} records, {} skipped",
        db.name,
        name,
        result.records.len(),
        result.skipped
    );
    result
}

/// Database names of one origin, for listings
///
/// Reads a safe copy when `options.safe_copy` is set, like [`extract_origin`].
pub fn list_database_names(
    store: &OriginStore,
    backend: &dyn DecodeBackend,
    options: &ExtractOptions,
) -> Result<Vec<String>, ExtractError> {
    with_acquired(&store.path, options.safe_copy, options.temp_root.as_deref(), |path| {
        let opened = backend.open(path)?;
        Ok(opened.databases().into_iter().map(|db| db.name).collect())
    })?
}

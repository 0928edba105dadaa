use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dynamically typed value as produced by a decode backend, before normalization.
///
/// Keys and values share this representation: IndexedDB keys are a subset of the
/// value space plus compound (array) keys.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Undefined,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Date encoded by the storage engine: milliseconds since the epoch as a double
    Date(f64),
    Array(Vec<RawValue>),
    /// Ordered mapping. Keys are not restricted to strings.
    Map(Vec<(RawValue, RawValue)>),
    CompoundKey(Vec<RawValue>),
    /// Engine-specific value with no JSON counterpart, carried as its textual form
    Opaque(String),
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    RawValue::UInt(u)
                } else {
                    RawValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => RawValue::String(s),
            Value::Array(items) => RawValue::Array(items.into_iter().map(RawValue::from).collect()),
            Value::Object(map) => RawValue::Map(
                map.into_iter().map(|(k, v)| (RawValue::String(k), RawValue::from(v))).collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Live,
    Deleted,
}

/// One (key, value) pair yielded by a decode backend
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub key: RawValue,
    pub value: RawValue,
    pub state: Option<RecordState>,
}

impl RawRecord {
    pub fn new(key: RawValue, value: RawValue) -> Self {
        Self { key, value, state: None }
    }

    pub fn with_state(mut self, state: RecordState) -> Self {
        self.state = Some(state);
        self
    }
}

/// Identifies one logical database inside an origin store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseId {
    pub name: String,
    pub id: u64,
    pub origin: String,
}

/// A normalized record, ready for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: Value,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RecordState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStoreExtraction {
    pub name: String,
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseExtraction {
    pub name: String,
    pub id: u64,
    pub origin: String,
    pub object_stores: Vec<ObjectStoreExtraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything extracted from one origin directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginExtraction {
    pub path: String,
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub databases: Vec<DatabaseExtraction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OriginExtraction {
    pub fn record_count(&self) -> usize {
        self.object_stores().map(|s| s.records.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.object_stores().map(|s| s.skipped).sum()
    }

    /// True if the origin itself or any database/object store inside it reported an error
    pub fn has_errors(&self) -> bool {
        self.error.is_some()
            || self.databases.iter().any(|db| db.error.is_some())
            || self.object_stores().any(|s| s.error.is_some())
    }

    fn object_stores(&self) -> impl Iterator<Item = &ObjectStoreExtraction> {
        self.databases.iter().flat_map(|db| db.object_stores.iter())
    }
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

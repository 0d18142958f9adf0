//! Record types at the storage/response boundary.
//!
//! Stored documents are written by an external scraper and their shape is not
//! trusted. [`ReducedRecord::from_document`] is the only place that looks
//! inside a [`RawDocument`]; everything downstream works with the reduced,
//! default-filled shape.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A stored document as handed out by the store, already converted to JSON.
pub type RawDocument = Map<String, Value>;

/// The public `{city, state, jobs}` projection of a stored job record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReducedRecord {
    pub city: String,
    pub state: String,
    /// Opaque mapping of job title to whatever the scraper stored for it.
    pub jobs: Value,
}

impl ReducedRecord {
    /// Project a raw document, filling defaults for anything missing.
    ///
    /// `null` counts as missing. A non-string `city` or `state` becomes `""`;
    /// `jobs` is passed through untouched unless it is missing, in which case
    /// it becomes `{}`.
    pub fn from_document(doc: &RawDocument) -> Self {
        Self {
            city: string_field(doc, "city"),
            state: string_field(doc, "state"),
            jobs: match doc.get("jobs") {
                None | Some(Value::Null) => Value::Object(Map::new()),
                Some(jobs) => jobs.clone(),
            },
        }
    }
}

fn string_field(doc: &RawDocument, key: &str) -> String {
    match doc.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Response payload for a keyword lookup: `{ "<keyword>": [records...] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub keyword: String,
    pub records: Vec<ReducedRecord>,
}

impl LookupResult {
    pub fn new(keyword: impl Into<String>, records: Vec<ReducedRecord>) -> Self {
        Self {
            keyword: keyword.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for LookupResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.keyword, &self.records)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

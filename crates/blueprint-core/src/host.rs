//! Host platform abstraction
//!
//! The engine never talks to storage directly; it goes through [`Host`],
//! which exposes the platform's per-type record operations and the
//! id↔handle lookup tables for referenced collections. Saves and deletes
//! are expected to run inside the host's own transaction boundary; the
//! engine does not span transactions across records.
//!
//! [`MemoryHost`] is the in-process implementation used by the CLI
//! (operating on a live-state snapshot file) and by tests.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;
use crate::reference::RefCollection;

/// Live-object API of the host platform.
pub trait Host {
    /// All records of one type, in the host's native enumeration order.
    fn records(&self, type_handle: &str) -> Vec<Record>;

    /// A single record by exact handle match.
    fn get_record(&self, type_handle: &str, handle: &str) -> Option<Record>;

    /// Persist a record, assigning an id on first save.
    ///
    /// A validation rejection is a normal result, returned as `Err` with
    /// the host's reasons; it is not a fault.
    fn save(&mut self, type_handle: &str, record: Record) -> Result<Record, Vec<String>>;

    /// Delete a record by handle. Returns false when it did not exist.
    fn delete(&mut self, type_handle: &str, handle: &str) -> bool;

    /// The id↔handle lookup table for one referenced collection.
    fn collection_entries(&self, collection: RefCollection) -> Vec<(i64, String)>;
}

/// The store a referenced collection's lookup table is drawn from.
fn collection_type_handle(collection: RefCollection) -> &'static str {
    match collection {
        RefCollection::Sites => "sites",
        RefCollection::Fields => "fields",
        RefCollection::Sections => "sections",
        RefCollection::Volumes => "volumes",
        RefCollection::UserGroups => "userGroups",
    }
}

/// In-memory host: records grouped by type handle, ids assigned
/// monotonically across the whole instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHost {
    #[serde(default)]
    stores: IndexMap<String, Vec<Record>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing validation. Assigns an id when
    /// the record has none. Intended for fixture construction.
    pub fn seed(&mut self, type_handle: &str, mut record: Record) -> i64 {
        let id = record.id.unwrap_or_else(|| self.next_id());
        record.id = Some(id);
        assign_nested_ids(&mut record, id);
        self.stores
            .entry(type_handle.to_string())
            .or_default()
            .push(record);
        id
    }

    /// True when no store holds any record.
    pub fn is_empty(&self) -> bool {
        self.stores.values().all(Vec::is_empty)
    }

    fn next_id(&self) -> i64 {
        let max = self
            .stores
            .values()
            .flatten()
            .flat_map(record_ids)
            .max()
            .unwrap_or(0);
        max + 1
    }

    fn validate(record: &Record) -> Vec<String> {
        let mut errors = Vec::new();
        if record.handle.is_empty() {
            errors.push("Handle cannot be blank".to_string());
        }
        match record.attribute("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => {}
            _ => errors.push("Name cannot be blank".to_string()),
        }
        errors
    }
}

/// All ids held by a record, including nested block types.
fn record_ids(record: &Record) -> Vec<i64> {
    let mut ids: Vec<i64> = record.id.into_iter().collect();
    for block in &record.block_types {
        ids.extend(record_ids(block));
    }
    ids
}

/// Assign ids to nested parts that lack one, counting up from the
/// parent's id to stay unique within the instance.
fn assign_nested_ids(record: &mut Record, parent_id: i64) {
    let mut next = parent_id * 100;
    for block in &mut record.block_types {
        if block.id.is_none() {
            next += 1;
            block.id = Some(next);
        }
    }
    if let Some(layout) = &mut record.field_layout {
        if layout.id.is_none() {
            layout.id = Some(parent_id);
        }
    }
}

impl Host for MemoryHost {
    fn records(&self, type_handle: &str) -> Vec<Record> {
        self.stores.get(type_handle).cloned().unwrap_or_default()
    }

    fn get_record(&self, type_handle: &str, handle: &str) -> Option<Record> {
        self.stores
            .get(type_handle)?
            .iter()
            .find(|record| record.handle == handle)
            .cloned()
    }

    fn save(&mut self, type_handle: &str, mut record: Record) -> Result<Record, Vec<String>> {
        let errors = Self::validate(&record);
        if !errors.is_empty() {
            return Err(errors);
        }

        let now = Value::from(Utc::now().to_rfc3339());
        if record.id.is_none() {
            record.id = Some(self.next_id());
            record.set_attribute("dateCreated", now.clone());
        }
        record.set_attribute("dateUpdated", now);
        let id = record.id.unwrap_or_default();
        assign_nested_ids(&mut record, id);

        let store = self.stores.entry(type_handle.to_string()).or_default();
        match store.iter_mut().find(|existing| existing.handle == record.handle) {
            Some(existing) => *existing = record.clone(),
            None => store.push(record.clone()),
        }
        Ok(record)
    }

    fn delete(&mut self, type_handle: &str, handle: &str) -> bool {
        let Some(store) = self.stores.get_mut(type_handle) else {
            return false;
        };
        let before = store.len();
        store.retain(|record| record.handle != handle);
        store.len() != before
    }

    fn collection_entries(&self, collection: RefCollection) -> Vec<(i64, String)> {
        self.records(collection_type_handle(collection))
            .into_iter()
            .filter_map(|record| record.id.map(|id| (id, record.handle)))
            .collect()
    }
}

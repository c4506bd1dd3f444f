//! Portable record definitions
//!
//! A [`Definition`] is the declarative, instance-independent description
//! of one configuration record. It carries attribute values and nested
//! structure but never internal numeric ids: records in other
//! collections are referenced by handle, so a definition can be replayed
//! onto any instance.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A whole-system document: data type handle → record handle → definition.
///
/// Both levels preserve insertion order; export emits types in registry
/// order and records in the host's native enumeration order.
pub type Document = IndexMap<String, IndexMap<String, Definition>>;

/// Declarative description of a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Variant tag, e.g. `field`, `matrixField`, `section`
    pub variant: String,
    /// Attribute name → scalar value, in export order
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
    /// Owning group name, for grouped records such as fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Nested field layout, referenced by field handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_layout: Option<FieldLayoutDefinition>,
    /// Per-site attribute overrides, keyed by site handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_settings: Option<IndexMap<String, Definition>>,
    /// Sub-record definitions for block-composed records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_types: Option<Vec<Definition>>,
}

impl Definition {
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            attributes: IndexMap::new(),
            group: None,
            field_layout: None,
            site_settings: None,
            block_types: None,
        }
    }

    /// Attribute value by name, if present.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The `handle` attribute as a string, if present. Used to match
    /// nested sub-records, which are carried as a list rather than a
    /// handle-keyed map.
    pub fn handle(&self) -> Option<&str> {
        self.attributes.get("handle").and_then(Value::as_str)
    }
}

/// Declarative field layout: named tabs with field handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayoutDefinition {
    #[serde(default)]
    pub tabs: Vec<FieldLayoutTabDefinition>,
}

/// One tab of a field layout definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayoutTabDefinition {
    pub name: String,
    /// Field handles assigned to this tab, in display order
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Merge an override document over a base document in place.
///
/// Types and records present only in the override are appended; where
/// both documents define a record, the override's attributes win key by
/// key and its nested structures replace the base's wholesale when set.
pub fn merge_override(base: &mut Document, override_doc: Document) {
    for (type_handle, records) in override_doc {
        let base_records = base.entry(type_handle).or_default();
        for (handle, definition) in records {
            match base_records.get_mut(&handle) {
                Some(existing) => existing.merge_from(definition),
                None => {
                    base_records.insert(handle, definition);
                }
            }
        }
    }
}

impl Definition {
    fn merge_from(&mut self, other: Definition) {
        for (name, value) in other.attributes {
            self.attributes.insert(name, value);
        }
        if other.group.is_some() {
            self.group = other.group;
        }
        if other.field_layout.is_some() {
            self.field_layout = other.field_layout;
        }
        if other.site_settings.is_some() {
            self.site_settings = other.site_settings;
        }
        if other.block_types.is_some() {
            self.block_types = other.block_types;
        }
    }
}

//! Live configuration records
//!
//! A [`Record`] is a configuration object as the host platform holds it:
//! identified by an internal numeric id plus a stable handle, with raw
//! attribute values that may still contain instance-specific bookkeeping
//! (ids, timestamps). Converters translate between this shape and the
//! portable [`Definition`](crate::definition::Definition).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attributes that are instance-specific bookkeeping and must never
/// appear in a portable definition.
pub const VOLATILE_ATTRIBUTES: &[&str] = &[
    "id",
    "structureId",
    "dateCreated",
    "dateUpdated",
    "fieldLayoutId",
    "fieldId",
    "uid",
];

/// A live configuration object owned by the host platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Internal id, assigned by the host on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Stable human-readable identifier
    pub handle: String,
    /// Variant tag selecting the converter, e.g. `field`, `matrixField`
    pub variant: String,
    /// Raw attribute values, in the host's storage order
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
    /// Owning group name, for grouped records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Field layout, when the record owns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_layout: Option<FieldLayout>,
    /// Localized per-site overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub site_settings: Vec<SiteSetting>,
    /// Nested sub-records for block-composed records
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_types: Vec<Record>,
}

impl Record {
    pub fn new(variant: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id: None,
            handle: handle.into(),
            variant: variant.into(),
            attributes: IndexMap::new(),
            group: None,
            field_layout: None,
            site_settings: Vec::new(),
            block_types: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }
}

/// Field layout as the host stores it: tabs referencing fields by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub tabs: Vec<FieldLayoutTab>,
}

/// One tab of a live field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLayoutTab {
    pub name: String,
    /// Internal field ids assigned to this tab, in display order
    #[serde(default)]
    pub field_ids: Vec<i64>,
}

/// A localized attribute override scoped to one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    /// Internal id of the site this setting applies to
    pub site_id: i64,
    /// Variant tag of the setting's own converter shape
    pub variant: String,
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
}

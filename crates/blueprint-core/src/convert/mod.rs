//! Per-variant record converters
//!
//! A [`Converter`] performs the bidirectional transform for one record
//! variant: live [`Record`] → portable [`Definition`] on export, and the
//! reverse (attribute population, save, delete) on import. A
//! [`ConverterSet`] maps variant tags to their converter so dispatch is a
//! single lookup per record, with no runtime type inspection.
//!
//! Shared nested-structure handling lives in composed helpers rather
//! than inheritance: [`LayoutTransformer`] for field layouts and
//! [`SourceTransformer`] for source attributes.

mod block;
mod layout;
mod model;
mod sources;

pub use block::{BlockFieldConverter, BlockTypeConverter};
pub use layout::LayoutTransformer;
pub use model::ModelConverter;
pub use sources::SourceTransformer;

use indexmap::IndexMap;
use serde_json::Value;

use crate::definition::Definition;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::record::{Record, VOLATILE_ATTRIBUTES};
use crate::reference::{RefCollection, ReferenceResolver};
use crate::report::Reporter;

/// How import reacts to a handle that cannot be resolved against the
/// live instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Skip the reference or sub-record with one warning (default)
    #[default]
    Lenient,
    /// Fail the record; the failure lands in the batch result
    Strict,
}

/// Shared state threaded through converter calls for one type's pass.
pub struct ConvertContext<'a> {
    /// Data type whose records are being processed
    pub type_handle: &'a str,
    /// Import strictness; irrelevant on the export path
    pub strictness: Strictness,
    /// id↔handle snapshot of the live instance
    pub resolver: &'a ReferenceResolver,
    /// Warning sink for the pass
    pub reporter: &'a mut Reporter,
}

/// Bidirectional per-record transform for one variant.
pub trait Converter: std::fmt::Debug {
    /// Extract a portable definition from a live record. Pure read.
    fn get_record_definition(&self, record: &Record, ctx: &mut ConvertContext<'_>) -> Definition;

    /// Populate a record from a definition, with `defaults` merged under
    /// the definition's attributes (the definition wins).
    ///
    /// Returns `Err` only under [`Strictness::Strict`] when a reference
    /// does not resolve; lenient mode degrades to a warning.
    fn set_record_attributes(
        &self,
        record: &mut Record,
        definition: &Definition,
        defaults: &IndexMap<String, Value>,
        ctx: &mut ConvertContext<'_>,
    ) -> Result<()>;

    /// Persist the record. A host-side validation rejection is a normal
    /// result, returned as `Err` with the host's reason.
    fn save_record(
        &self,
        host: &mut dyn Host,
        record: &mut Record,
        definition: &Definition,
        ctx: &mut ConvertContext<'_>,
    ) -> std::result::Result<(), String>;

    /// Delete the record. Returns false when the host refused or the
    /// record no longer exists.
    fn delete_record(
        &self,
        host: &mut dyn Host,
        record: &Record,
        ctx: &mut ConvertContext<'_>,
    ) -> bool;
}

/// Registry of converters keyed by variant tag.
pub struct ConverterSet {
    converters: IndexMap<String, Box<dyn Converter + Send + Sync>>,
}

impl ConverterSet {
    pub fn empty() -> Self {
        Self {
            converters: IndexMap::new(),
        }
    }

    /// The built-in variant set.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.register("site", ModelConverter::new());
        set.register("field", ModelConverter::with_sources(RefCollection::Sections));
        set.register("matrixField", BlockFieldConverter::new());
        set.register("matrixBlockType", BlockTypeConverter::new());
        set.register("section", ModelConverter::new());
        set.register("volume", ModelConverter::new());
        set.register("userGroup", ModelConverter::new());
        set.register("globalSet", ModelConverter::new());
        set
    }

    pub fn register(
        &mut self,
        variant: impl Into<String>,
        converter: impl Converter + Send + Sync + 'static,
    ) {
        self.converters.insert(variant.into(), Box::new(converter));
    }

    /// Resolve the converter for a variant tag.
    pub fn converter_for(&self, variant: &str) -> Result<&(dyn Converter + Send + Sync)> {
        self.converters
            .get(variant)
            .map(Box::as_ref)
            .ok_or_else(|| Error::UnknownVariant {
                variant: variant.to_string(),
            })
    }
}

impl Default for ConverterSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Attribute map with instance-specific bookkeeping removed.
pub(crate) fn strip_volatile(attributes: &IndexMap<String, Value>) -> IndexMap<String, Value> {
    attributes
        .iter()
        .filter(|(name, _)| !VOLATILE_ATTRIBUTES.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Definition attributes over defaults; the definition wins on conflict.
pub(crate) fn merged_attributes(
    definition: &Definition,
    defaults: &IndexMap<String, Value>,
) -> IndexMap<String, Value> {
    let mut merged = definition.attributes.clone();
    for (name, value) in defaults {
        if !merged.contains_key(name) {
            merged.insert(name.clone(), value.clone());
        }
    }
    merged
}

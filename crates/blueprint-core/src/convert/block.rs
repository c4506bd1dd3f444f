//! Converters for block-composed records
//!
//! A block-composed field owns a set of block-type sub-records. The
//! sub-records are carried in the definition as a `blockTypes` list and
//! persist with their parent; they are reconciled by handle when the
//! parent saves, with the parent's id merged under their attributes.

use indexmap::IndexMap;
use serde_json::Value;

use super::{ConvertContext, Converter, ModelConverter};
use crate::definition::Definition;
use crate::error::Result;
use crate::host::Host;
use crate::record::Record;

/// Converter for leaf block-type sub-records.
///
/// Block types never export a field layout, since they are themselves
/// part of one and exporting it would nest without end. They persist
/// with their parent record, so save and delete only stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockTypeConverter {
    inner: ModelConverter,
}

impl BlockTypeConverter {
    pub fn new() -> Self {
        Self {
            inner: ModelConverter::without_layout_export(),
        }
    }
}

impl Converter for BlockTypeConverter {
    fn get_record_definition(&self, record: &Record, ctx: &mut ConvertContext<'_>) -> Definition {
        let mut definition = self.inner.get_record_definition(record, ctx);
        // Sub-records travel as a list, so the handle rides along as an
        // attribute instead of a map key.
        definition
            .attributes
            .entry("handle".to_string())
            .or_insert_with(|| Value::from(record.handle.clone()));
        definition
    }

    fn set_record_attributes(
        &self,
        record: &mut Record,
        definition: &Definition,
        defaults: &IndexMap<String, Value>,
        ctx: &mut ConvertContext<'_>,
    ) -> Result<()> {
        self.inner
            .set_record_attributes(record, definition, defaults, ctx)
    }

    fn save_record(
        &self,
        _host: &mut dyn Host,
        _record: &mut Record,
        _definition: &Definition,
        _ctx: &mut ConvertContext<'_>,
    ) -> std::result::Result<(), String> {
        // Persisted with the parent record.
        Ok(())
    }

    fn delete_record(
        &self,
        _host: &mut dyn Host,
        _record: &Record,
        _ctx: &mut ConvertContext<'_>,
    ) -> bool {
        // Dropped when the parent saves without this block.
        true
    }
}

/// Converter for block-composed fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFieldConverter {
    inner: ModelConverter,
    blocks: BlockTypeConverter,
}

impl BlockFieldConverter {
    pub fn new() -> Self {
        Self {
            inner: ModelConverter::without_layout_export(),
            blocks: BlockTypeConverter::new(),
        }
    }

    /// Rebuild the block set from the definition: existing blocks are
    /// matched by handle and updated, unknown handles become new blocks,
    /// and blocks absent from the definition are dropped. The document
    /// is authoritative for nested structure.
    fn reconcile_blocks(
        &self,
        record: &mut Record,
        block_definitions: &[Definition],
        ctx: &mut ConvertContext<'_>,
    ) -> std::result::Result<(), String> {
        let mut defaults = IndexMap::new();
        if let Some(field_id) = record.id {
            defaults.insert("fieldId".to_string(), Value::from(field_id));
        }

        let existing = std::mem::take(&mut record.block_types);
        let mut blocks = Vec::with_capacity(block_definitions.len());
        for block_definition in block_definitions {
            let Some(handle) = block_definition.handle() else {
                ctx.reporter
                    .warn("Block type definition without a handle was skipped".to_string());
                continue;
            };
            let mut block = existing
                .iter()
                .find(|block| block.handle == handle)
                .cloned()
                .unwrap_or_else(|| Record::new(&block_definition.variant, handle));
            self.blocks
                .set_record_attributes(&mut block, block_definition, &defaults, ctx)
                .map_err(|error| error.to_string())?;
            blocks.push(block);
        }
        record.block_types = blocks;
        Ok(())
    }
}

impl Converter for BlockFieldConverter {
    fn get_record_definition(&self, record: &Record, ctx: &mut ConvertContext<'_>) -> Definition {
        let mut definition = self.inner.get_record_definition(record, ctx);
        if !record.block_types.is_empty() {
            definition.block_types = Some(
                record
                    .block_types
                    .iter()
                    .map(|block| self.blocks.get_record_definition(block, ctx))
                    .collect(),
            );
        }
        definition
    }

    fn set_record_attributes(
        &self,
        record: &mut Record,
        definition: &Definition,
        defaults: &IndexMap<String, Value>,
        ctx: &mut ConvertContext<'_>,
    ) -> Result<()> {
        self.inner
            .set_record_attributes(record, definition, defaults, ctx)
    }

    fn save_record(
        &self,
        host: &mut dyn Host,
        record: &mut Record,
        definition: &Definition,
        ctx: &mut ConvertContext<'_>,
    ) -> std::result::Result<(), String> {
        // First save assigns the parent id the blocks need as a default.
        match host.save(ctx.type_handle, record.clone()) {
            Ok(saved) => *record = saved,
            Err(reasons) => return Err(reasons.join("; ")),
        }

        let Some(block_definitions) = &definition.block_types else {
            return Ok(());
        };
        self.reconcile_blocks(record, block_definitions, ctx)?;

        match host.save(ctx.type_handle, record.clone()) {
            Ok(saved) => {
                *record = saved;
                Ok(())
            }
            Err(reasons) => Err(reasons.join("; ")),
        }
    }

    fn delete_record(
        &self,
        host: &mut dyn Host,
        record: &Record,
        ctx: &mut ConvertContext<'_>,
    ) -> bool {
        host.delete(ctx.type_handle, &record.handle)
    }
}

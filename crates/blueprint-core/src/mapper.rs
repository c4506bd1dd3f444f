//! Per-type export/import orchestration
//!
//! A [`RecordMapper`] walks every record of one data type. Export
//! preserves the host's enumeration order; import reconciles the
//! document against the live set by exact, case-sensitive handle match:
//! unknown handles are created, known handles updated, and, only under
//! force, live handles absent from the document are deleted. A failing
//! record is recorded and the batch moves on.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::convert::{ConvertContext, ConverterSet, Strictness};
use crate::definition::Definition;
use crate::host::Host;
use crate::record::Record;
use crate::reference::ReferenceResolver;
use crate::report::{BatchResult, Reporter};

/// Orchestrates export and import for one data type.
pub struct RecordMapper {
    type_handle: String,
    converters: Arc<ConverterSet>,
}

impl RecordMapper {
    pub fn new(type_handle: impl Into<String>, converters: Arc<ConverterSet>) -> Self {
        Self {
            type_handle: type_handle.into(),
            converters,
        }
    }

    pub fn type_handle(&self) -> &str {
        &self.type_handle
    }

    /// Convert every live record of this type, in enumeration order.
    pub fn export(
        &self,
        host: &dyn Host,
        resolver: &ReferenceResolver,
        reporter: &mut Reporter,
    ) -> IndexMap<String, Definition> {
        let mut definitions = IndexMap::new();
        for record in host.records(&self.type_handle) {
            let converter = match self.converters.converter_for(&record.variant) {
                Ok(converter) => converter,
                Err(error) => {
                    reporter.warn(format!("{} was skipped: {}", record.handle, error));
                    continue;
                }
            };
            let mut ctx = ConvertContext {
                type_handle: &self.type_handle,
                strictness: Strictness::Lenient,
                resolver,
                reporter: &mut *reporter,
            };
            let definition = converter.get_record_definition(&record, &mut ctx);
            definitions.insert(record.handle, definition);
        }
        definitions
    }

    /// Reconcile the document's definitions against the live records.
    pub fn import(
        &self,
        host: &mut dyn Host,
        definitions: &IndexMap<String, Definition>,
        existing: Vec<Record>,
        force: bool,
        strictness: Strictness,
        resolver: &ReferenceResolver,
        reporter: &mut Reporter,
    ) -> BatchResult {
        let mut batch = BatchResult::default();

        for (handle, definition) in definitions {
            let converter = match self.converters.converter_for(&definition.variant) {
                Ok(converter) => converter,
                Err(error) => {
                    batch.record_failure(handle, error.to_string());
                    continue;
                }
            };

            let mut record = existing
                .iter()
                .find(|record| &record.handle == handle)
                .cloned()
                .unwrap_or_else(|| Record::new(&definition.variant, handle));

            let misses_before = reporter.deferred_misses();
            let mut ctx = ConvertContext {
                type_handle: &self.type_handle,
                strictness,
                resolver,
                reporter: &mut *reporter,
            };
            if let Err(error) =
                converter.set_record_attributes(&mut record, definition, &IndexMap::new(), &mut ctx)
            {
                batch.record_failure(handle, error.to_string());
                continue;
            }
            match converter.save_record(host, &mut record, definition, &mut ctx) {
                Ok(()) => {
                    tracing::debug!("Saved {} {}", self.type_handle, handle);
                    if reporter.deferred_misses() > misses_before {
                        batch.deferred.push(handle.clone());
                    }
                    batch.record_success();
                }
                Err(reason) => batch.record_failure(handle, reason),
            }
        }

        if force {
            for record in existing
                .iter()
                .filter(|record| !definitions.contains_key(&record.handle))
            {
                let converter = match self.converters.converter_for(&record.variant) {
                    Ok(converter) => converter,
                    Err(error) => {
                        batch.record_failure(&record.handle, error.to_string());
                        continue;
                    }
                };
                let mut ctx = ConvertContext {
                    type_handle: &self.type_handle,
                    strictness,
                    resolver,
                    reporter: &mut *reporter,
                };
                if converter.delete_record(host, record, &mut ctx) {
                    tracing::debug!("Deleted {} {}", self.type_handle, record.handle);
                    batch.record_success();
                } else {
                    batch.record_failure(&record.handle, "could not be deleted".to_string());
                }
            }
        }

        batch
    }
}

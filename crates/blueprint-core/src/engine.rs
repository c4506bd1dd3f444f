//! Engine for synchronizing configuration state
//!
//! The [`SyncEngine`] is the outward facade: it walks the data type
//! registry and drives the mappers, producing a whole-system [`Document`]
//! on export and a [`SyncReport`] on import. Types are processed
//! strictly sequentially in registry order, records sequentially in
//! document order; nothing here spans a transaction across records.

use indexmap::IndexMap;

use crate::convert::{ConverterSet, Strictness};
use crate::definition::{Definition, Document};
use crate::host::Host;
use crate::reference::ReferenceResolver;
use crate::registry::{DataTypeRegistry, Selector};
use crate::report::{Reporter, SyncReport};

use std::sync::Arc;

/// Options for an import pass.
///
/// Force and strictness are explicit parameters threaded through every
/// level; the engine holds no state between invocations.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Delete live records whose handle is absent from the document
    pub force: bool,
    /// How unresolved references are treated
    pub strictness: Strictness,
    /// Which data types to import
    pub selector: Selector,
}

/// Outcome of an export pass.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub document: Document,
    /// Non-fatal conditions encountered, e.g. invalid selector entries
    pub warnings: Vec<String>,
}

/// Facade over the registry, mappers, and converters.
pub struct SyncEngine {
    registry: DataTypeRegistry,
}

impl SyncEngine {
    /// Engine with the built-in type and converter set.
    pub fn new() -> Self {
        Self {
            registry: DataTypeRegistry::builtin(Arc::new(ConverterSet::builtin())),
        }
    }

    /// Engine over a caller-assembled registry.
    pub fn with_registry(registry: DataTypeRegistry) -> Self {
        Self { registry }
    }

    /// Registered data type handles, in processing order.
    pub fn known_types(&self) -> Vec<String> {
        self.registry.known_types()
    }

    /// Export the selected types into a whole-system document.
    pub fn export(&self, host: &dyn Host, selector: &Selector) -> ExportResult {
        let mut reporter = Reporter::new();
        let selection = self.registry.select(selector);
        if !selection.invalid.is_empty() {
            reporter.warn(self.registry.invalid_selector_warning(&selection.invalid));
        }

        let resolver = ReferenceResolver::from_host(host);
        let mut document = Document::new();
        for type_handle in &selection.active {
            let Some(mapper) = self.registry.mapper(type_handle) else {
                continue;
            };
            tracing::info!("Exporting {}", type_handle);
            let definitions = mapper.export(host, &resolver, &mut reporter);
            document.insert(type_handle.clone(), definitions);
        }

        ExportResult {
            document,
            warnings: reporter.take_warnings(),
        }
    }

    /// Import a document onto the live instance.
    ///
    /// Types present in the document but not registered are warned
    /// about; selected types absent from the document are skipped, so
    /// force never deletes a whole type the document does not mention.
    ///
    /// References can point forward across type passes (a field's
    /// sources naming a section imported later). Under lenient
    /// strictness a miss is deferred rather than warned; once every
    /// pass has run, the affected records are re-imported against the
    /// final state, and only references that still do not resolve
    /// produce warnings.
    pub fn import(
        &self,
        host: &mut dyn Host,
        document: &Document,
        options: &ImportOptions,
    ) -> SyncReport {
        let mut report = SyncReport::new();
        let mut reporter = Reporter::deferring();

        let selection = self.registry.select(&options.selector);
        if !selection.invalid.is_empty() {
            reporter.warn(self.registry.invalid_selector_warning(&selection.invalid));
        }
        for type_handle in document.keys() {
            if self.registry.mapper(type_handle).is_none() {
                reporter.warn(format!("Unknown data type in document: {}", type_handle));
            }
        }

        let mut deferred: Vec<(String, Vec<String>)> = Vec::new();
        for type_handle in &selection.active {
            let Some(definitions) = document.get(type_handle) else {
                continue;
            };
            let Some(mapper) = self.registry.mapper(type_handle) else {
                continue;
            };
            tracing::info!("Importing {}", type_handle);

            // Fresh snapshot per type so records created by earlier
            // types resolve by handle.
            let resolver = ReferenceResolver::from_host(host);
            let existing = host.records(type_handle);
            let mut batch = mapper.import(
                host,
                definitions,
                existing,
                options.force,
                options.strictness,
                &resolver,
                &mut reporter,
            );
            if !batch.deferred.is_empty() {
                deferred.push((type_handle.clone(), std::mem::take(&mut batch.deferred)));
            }
            report.absorb(type_handle, batch);
        }

        // Retry records whose references missed earlier; every type has
        // been imported now, so a second miss is final and warns.
        if !deferred.is_empty() {
            reporter.stop_deferring();
            let resolver = ReferenceResolver::from_host(host);
            for (type_handle, handles) in deferred {
                let Some(definitions) = document.get(&type_handle) else {
                    continue;
                };
                let Some(mapper) = self.registry.mapper(&type_handle) else {
                    continue;
                };
                tracing::debug!("Retrying {} deferred {} record(s)", handles.len(), type_handle);
                let retry: IndexMap<String, Definition> = handles
                    .into_iter()
                    .filter_map(|handle| {
                        definitions
                            .get(&handle)
                            .map(|definition| (handle, definition.clone()))
                    })
                    .collect();
                let existing = host.records(&type_handle);
                let batch = mapper.import(
                    host,
                    &retry,
                    existing,
                    false,
                    options.strictness,
                    &resolver,
                    &mut reporter,
                );
                report.failures.extend(batch.failures);
            }
            report.success = report.failures.is_empty();
        }

        report.warnings = reporter.take_warnings();
        report
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

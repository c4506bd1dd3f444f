//! Base model converter
//!
//! Handles the common record shape: plain attributes, an optional field
//! layout, per-site setting overrides, and source references. Covers
//! sites, simple fields, sections, volumes, user groups, and global
//! sets; the block converters compose it for their nested parts.

use indexmap::IndexMap;
use serde_json::Value;

use super::{
    ConvertContext, Converter, LayoutTransformer, SourceTransformer, Strictness, merged_attributes,
    strip_volatile,
};
use crate::definition::Definition;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::record::{Record, SiteSetting};
use crate::reference::RefCollection;

/// Converter for simple and layout-bearing records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelConverter {
    sources: Option<SourceTransformer>,
    layout: LayoutTransformer,
    /// Leaf sub-records that are themselves part of a layout never
    /// export one, to avoid infinite nesting.
    export_layout: bool,
}

impl ModelConverter {
    pub fn new() -> Self {
        Self {
            sources: None,
            layout: LayoutTransformer::new(),
            export_layout: true,
        }
    }

    /// A model converter whose `source`/`sources` attributes reference
    /// the given collection.
    pub fn with_sources(collection: RefCollection) -> Self {
        Self {
            sources: Some(SourceTransformer::new(collection)),
            ..Self::new()
        }
    }

    /// Disable layout export for leaf sub-record variants.
    pub(crate) fn without_layout_export() -> Self {
        Self {
            export_layout: false,
            ..Self::new()
        }
    }

    fn export_site_settings(
        &self,
        record: &Record,
        ctx: &mut ConvertContext<'_>,
    ) -> IndexMap<String, Definition> {
        let mut settings = IndexMap::new();
        for setting in &record.site_settings {
            let Some(site_handle) = ctx.resolver.site_handle(setting.site_id) else {
                ctx.reporter.warn(format!(
                    "Site with id {} could not be found",
                    setting.site_id
                ));
                continue;
            };
            let mut definition = Definition::new(&setting.variant);
            definition.attributes = strip_volatile(&setting.attributes);
            definition.attributes.shift_remove("siteId");
            settings.insert(site_handle, definition);
        }
        settings
    }

    fn apply_site_settings(
        &self,
        record: &mut Record,
        definitions: &IndexMap<String, Definition>,
        ctx: &mut ConvertContext<'_>,
    ) -> Result<()> {
        let mut settings = Vec::with_capacity(definitions.len());
        for (site_handle, definition) in definitions {
            let Some(site_id) = ctx.resolver.site_id(site_handle) else {
                if ctx.strictness == Strictness::Strict {
                    return Err(Error::UnresolvedReference {
                        collection: RefCollection::Sites.to_string(),
                        identifier: site_handle.clone(),
                    });
                }
                ctx.reporter
                    .unresolved(format!("Site {} could not be found", site_handle));
                continue;
            };
            settings.push(SiteSetting {
                site_id,
                variant: definition.variant.clone(),
                attributes: definition.attributes.clone(),
            });
        }
        record.site_settings = settings;
        Ok(())
    }
}

impl Converter for ModelConverter {
    fn get_record_definition(&self, record: &Record, ctx: &mut ConvertContext<'_>) -> Definition {
        let mut definition = Definition::new(&record.variant);
        definition.attributes = strip_volatile(&record.attributes);
        definition.group = record.group.clone();

        if let Some(transformer) = &self.sources {
            transformer.define_sources(&mut definition.attributes, ctx);
        }

        if self.export_layout {
            if let Some(layout) = &record.field_layout {
                definition.field_layout = Some(self.layout.get_layout_definition(layout, ctx));
            }
        }

        if !record.site_settings.is_empty() {
            definition.site_settings = Some(self.export_site_settings(record, ctx));
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
        let mut attributes = merged_attributes(definition, defaults);
        if let Some(transformer) = &self.sources {
            transformer.apply_sources(&mut attributes, ctx)?;
        }
        for (name, value) in attributes {
            record.attributes.insert(name, value);
        }

        if definition.group.is_some() {
            record.group = definition.group.clone();
        }

        if let Some(layout_definition) = &definition.field_layout {
            record.field_layout = Some(self.layout.get_layout(layout_definition, ctx)?);
        }

        if let Some(site_settings) = &definition.site_settings {
            self.apply_site_settings(record, site_settings, ctx)?;
        }

        Ok(())
    }

    fn save_record(
        &self,
        host: &mut dyn Host,
        record: &mut Record,
        _definition: &Definition,
        ctx: &mut ConvertContext<'_>,
    ) -> std::result::Result<(), String> {
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

//! Field layout transformation
//!
//! Live layouts reference fields by internal id; portable layouts
//! reference them by field handle. The transformer translates between
//! the two through the fields lookup table.

use serde_json::Value;

use super::{ConvertContext, Strictness};
use crate::definition::{FieldLayoutDefinition, FieldLayoutTabDefinition};
use crate::error::{Error, Result};
use crate::record::{FieldLayout, FieldLayoutTab};
use crate::reference::{RefCollection, RefKey};

/// Translates field layouts between their live and portable shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutTransformer;

impl LayoutTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Live layout → portable definition. Field ids that no longer
    /// resolve are dropped from their tab with a warning.
    pub fn get_layout_definition(
        &self,
        layout: &FieldLayout,
        ctx: &mut ConvertContext<'_>,
    ) -> FieldLayoutDefinition {
        let tabs = layout
            .tabs
            .iter()
            .map(|tab| {
                let identifiers: Vec<Value> =
                    tab.field_ids.iter().copied().map(Value::from).collect();
                let fields = ctx
                    .resolver
                    .resolve(
                        RefCollection::Fields,
                        &identifiers,
                        RefKey::Id,
                        RefKey::Handle,
                        ctx.reporter,
                    )
                    .into_iter()
                    .filter_map(|value| value.as_str().map(str::to_string))
                    .collect();
                FieldLayoutTabDefinition {
                    name: tab.name.clone(),
                    fields,
                }
            })
            .collect();
        FieldLayoutDefinition { tabs }
    }

    /// Portable definition → live layout. Under lenient import an
    /// unresolved field handle is dropped with a warning; under strict
    /// import it fails the record.
    pub fn get_layout(
        &self,
        definition: &FieldLayoutDefinition,
        ctx: &mut ConvertContext<'_>,
    ) -> Result<FieldLayout> {
        let mut tabs = Vec::with_capacity(definition.tabs.len());
        for tab in &definition.tabs {
            let mut field_ids = Vec::with_capacity(tab.fields.len());
            for handle in &tab.fields {
                let resolved = ctx.resolver.resolve_one(
                    RefCollection::Fields,
                    &Value::from(handle.as_str()),
                    RefKey::Handle,
                    RefKey::Id,
                );
                match resolved.and_then(|value| value.as_i64()) {
                    Some(id) => field_ids.push(id),
                    None if ctx.strictness == Strictness::Strict => {
                        return Err(Error::UnresolvedReference {
                            collection: RefCollection::Fields.to_string(),
                            identifier: handle.clone(),
                        });
                    }
                    None => {
                        ctx.reporter
                            .unresolved(format!("Field {} could not be found", handle));
                    }
                }
            }
            tabs.push(FieldLayoutTab {
                name: tab.name.clone(),
                field_ids,
            });
        }
        Ok(FieldLayout { id: None, tabs })
    }
}

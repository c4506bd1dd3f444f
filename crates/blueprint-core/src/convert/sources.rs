//! Source attribute transformation
//!
//! Some records carry `source` / `sources` attributes pointing at
//! records of another collection (a field limited to certain sections,
//! for instance). Live records store internal ids; definitions store
//! handles.

use indexmap::IndexMap;
use serde_json::Value;

use super::{ConvertContext, Strictness};
use crate::error::{Error, Result};
use crate::reference::{RefCollection, RefKey};

const SOURCES_ATTRIBUTE: &str = "sources";
const SOURCE_ATTRIBUTE: &str = "source";

/// Rewrites `source`/`sources` attributes against one collection.
#[derive(Debug, Clone, Copy)]
pub struct SourceTransformer {
    collection: RefCollection,
}

impl SourceTransformer {
    pub fn new(collection: RefCollection) -> Self {
        Self { collection }
    }

    /// Rewrite id-space source attributes into handle space, in place.
    /// Stale ids are dropped with a warning.
    pub fn define_sources(
        &self,
        attributes: &mut IndexMap<String, Value>,
        ctx: &mut ConvertContext<'_>,
    ) {
        if let Some(Value::Array(identifiers)) = attributes.get(SOURCES_ATTRIBUTE).cloned() {
            let resolved =
                ctx.resolver
                    .resolve(self.collection, &identifiers, RefKey::Id, RefKey::Handle, ctx.reporter);
            attributes.insert(SOURCES_ATTRIBUTE.to_string(), Value::Array(resolved));
        }
        if let Some(identifier) = attributes.get(SOURCE_ATTRIBUTE).cloned() {
            match ctx
                .resolver
                .resolve_one(self.collection, &identifier, RefKey::Id, RefKey::Handle)
            {
                Some(handle) => {
                    attributes.insert(SOURCE_ATTRIBUTE.to_string(), handle);
                }
                None => {
                    ctx.reporter.unresolved(format!(
                        "Could not resolve {} reference {}",
                        self.collection, identifier
                    ));
                    attributes.shift_remove(SOURCE_ATTRIBUTE);
                }
            }
        }
    }

    /// Rewrite handle-space source attributes back into id space, in
    /// place. Lenient import drops unresolved handles with a warning;
    /// strict import fails the record.
    pub fn apply_sources(
        &self,
        attributes: &mut IndexMap<String, Value>,
        ctx: &mut ConvertContext<'_>,
    ) -> Result<()> {
        if let Some(Value::Array(identifiers)) = attributes.get(SOURCES_ATTRIBUTE).cloned() {
            if ctx.strictness == Strictness::Strict {
                let mut resolved = Vec::with_capacity(identifiers.len());
                for identifier in &identifiers {
                    match ctx.resolver.resolve_one(
                        self.collection,
                        identifier,
                        RefKey::Handle,
                        RefKey::Id,
                    ) {
                        Some(id) => resolved.push(id),
                        None => {
                            return Err(self.unresolved(identifier));
                        }
                    }
                }
                attributes.insert(SOURCES_ATTRIBUTE.to_string(), Value::Array(resolved));
            } else {
                let resolved = ctx.resolver.resolve(
                    self.collection,
                    &identifiers,
                    RefKey::Handle,
                    RefKey::Id,
                    ctx.reporter,
                );
                attributes.insert(SOURCES_ATTRIBUTE.to_string(), Value::Array(resolved));
            }
        }

        if let Some(identifier) = attributes.get(SOURCE_ATTRIBUTE).cloned() {
            match ctx
                .resolver
                .resolve_one(self.collection, &identifier, RefKey::Handle, RefKey::Id)
            {
                Some(id) => {
                    attributes.insert(SOURCE_ATTRIBUTE.to_string(), id);
                }
                None if ctx.strictness == Strictness::Strict => {
                    return Err(self.unresolved(&identifier));
                }
                None => {
                    ctx.reporter.unresolved(format!(
                        "Could not resolve {} reference {}",
                        self.collection, identifier
                    ));
                    attributes.shift_remove(SOURCE_ATTRIBUTE);
                }
            }
        }
        Ok(())
    }

    fn unresolved(&self, identifier: &Value) -> Error {
        Error::UnresolvedReference {
            collection: self.collection.to_string(),
            identifier: identifier
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| identifier.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceResolver;
    use crate::report::Reporter;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resolver() -> ReferenceResolver {
        let mut resolver = ReferenceResolver::new();
        resolver.insert(RefCollection::Sections, 1, "news");
        resolver.insert(RefCollection::Sections, 2, "blog");
        resolver
    }

    fn attributes(sources: Value) -> IndexMap<String, Value> {
        let mut attributes = IndexMap::new();
        attributes.insert("sources".to_string(), sources);
        attributes
    }

    #[test]
    fn define_sources_rewrites_ids_to_handles() {
        let resolver = resolver();
        let mut reporter = Reporter::new();
        let mut ctx = ConvertContext {
            type_handle: "fields",
            strictness: Strictness::Lenient,
            resolver: &resolver,
            reporter: &mut reporter,
        };
        let mut attributes = attributes(json!([1, 2]));

        SourceTransformer::new(RefCollection::Sections).define_sources(&mut attributes, &mut ctx);
        assert_eq!(attributes["sources"], json!(["news", "blog"]));
    }

    #[test]
    fn apply_sources_rewrites_handles_to_ids() {
        let resolver = resolver();
        let mut reporter = Reporter::new();
        let mut ctx = ConvertContext {
            type_handle: "fields",
            strictness: Strictness::Lenient,
            resolver: &resolver,
            reporter: &mut reporter,
        };
        let mut attributes = attributes(json!(["blog"]));

        SourceTransformer::new(RefCollection::Sections)
            .apply_sources(&mut attributes, &mut ctx)
            .unwrap();
        assert_eq!(attributes["sources"], json!([2]));
    }

    #[test]
    fn lenient_apply_drops_unknown_handles_and_warns() {
        let resolver = resolver();
        let mut reporter = Reporter::new();
        let mut ctx = ConvertContext {
            type_handle: "fields",
            strictness: Strictness::Lenient,
            resolver: &resolver,
            reporter: &mut reporter,
        };
        let mut attributes = attributes(json!(["news", "gone"]));

        SourceTransformer::new(RefCollection::Sections)
            .apply_sources(&mut attributes, &mut ctx)
            .unwrap();
        assert_eq!(attributes["sources"], json!([1]));
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn strict_apply_fails_on_unknown_handles() {
        let resolver = resolver();
        let mut reporter = Reporter::new();
        let mut ctx = ConvertContext {
            type_handle: "fields",
            strictness: Strictness::Strict,
            resolver: &resolver,
            reporter: &mut reporter,
        };
        let mut attributes = attributes(json!(["gone"]));

        let result =
            SourceTransformer::new(RefCollection::Sections).apply_sources(&mut attributes, &mut ctx);
        assert!(matches!(result, Err(Error::UnresolvedReference { .. })));
    }

    #[test]
    fn single_source_attribute_is_rewritten_in_both_directions() {
        let resolver = resolver();
        let mut reporter = Reporter::new();
        let mut ctx = ConvertContext {
            type_handle: "fields",
            strictness: Strictness::Lenient,
            resolver: &resolver,
            reporter: &mut reporter,
        };
        let transformer = SourceTransformer::new(RefCollection::Sections);

        let mut attributes = IndexMap::new();
        attributes.insert("source".to_string(), json!(1));
        transformer.define_sources(&mut attributes, &mut ctx);
        assert_eq!(attributes["source"], json!("news"));

        transformer.apply_sources(&mut attributes, &mut ctx).unwrap();
        assert_eq!(attributes["source"], json!(1));
    }
}

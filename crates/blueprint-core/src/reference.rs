//! Reference resolution between internal ids and portable handles
//!
//! Definitions reference records in other collections by handle; the live
//! platform references them by internal id. The [`ReferenceResolver`]
//! holds an id↔handle snapshot per collection and translates identifiers
//! in either direction. An identifier with no match is dropped from the
//! result with a warning rather than aborting resolution.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::host::Host;
use crate::report::Reporter;

/// Collections that records reference indirectly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefCollection {
    Sites,
    Fields,
    Sections,
    Volumes,
    UserGroups,
}

impl RefCollection {
    pub const ALL: &'static [RefCollection] = &[
        RefCollection::Sites,
        RefCollection::Fields,
        RefCollection::Sections,
        RefCollection::Volumes,
        RefCollection::UserGroups,
    ];
}

impl fmt::Display for RefCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefCollection::Sites => "sites",
            RefCollection::Fields => "fields",
            RefCollection::Sections => "sections",
            RefCollection::Volumes => "volumes",
            RefCollection::UserGroups => "userGroups",
        };
        f.write_str(name)
    }
}

/// Which identifier space a value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKey {
    Id,
    Handle,
}

/// One id↔handle pairing within a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: i64,
    pub handle: String,
}

/// Owned id↔handle snapshot for every referenced collection.
///
/// Rebuilt from the host before each type's import pass so that records
/// created earlier in the same import become resolvable.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    collections: IndexMap<RefCollection, Vec<Reference>>,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the lookup tables of every known collection.
    pub fn from_host(host: &dyn Host) -> Self {
        let mut resolver = Self::new();
        for &collection in RefCollection::ALL {
            let references = host
                .collection_entries(collection)
                .into_iter()
                .map(|(id, handle)| Reference { id, handle })
                .collect();
            resolver.collections.insert(collection, references);
        }
        resolver
    }

    /// Register a single pairing, mainly for tests.
    pub fn insert(&mut self, collection: RefCollection, id: i64, handle: impl Into<String>) {
        self.collections
            .entry(collection)
            .or_default()
            .push(Reference {
                id,
                handle: handle.into(),
            });
    }

    /// Translate identifiers from one key space to the other.
    ///
    /// Identifiers that do not match any live reference are dropped from
    /// the result, each with one warning.
    pub fn resolve(
        &self,
        collection: RefCollection,
        identifiers: &[Value],
        from: RefKey,
        to: RefKey,
        reporter: &mut Reporter,
    ) -> Vec<Value> {
        identifiers
            .iter()
            .filter_map(|identifier| {
                let resolved = self.resolve_one(collection, identifier, from, to);
                if resolved.is_none() {
                    reporter.unresolved(format!(
                        "Could not resolve {} reference {}",
                        collection,
                        display_identifier(identifier)
                    ));
                }
                resolved
            })
            .collect()
    }

    /// Translate a single identifier; `None` when it has no match.
    pub fn resolve_one(
        &self,
        collection: RefCollection,
        identifier: &Value,
        from: RefKey,
        to: RefKey,
    ) -> Option<Value> {
        let references = self.collections.get(&collection)?;
        let matched = references.iter().find(|reference| match from {
            RefKey::Id => identifier.as_i64() == Some(reference.id),
            RefKey::Handle => identifier.as_str() == Some(reference.handle.as_str()),
        })?;
        Some(match to {
            RefKey::Id => Value::from(matched.id),
            RefKey::Handle => Value::from(matched.handle.clone()),
        })
    }

    /// Look up a site's internal id by handle.
    pub fn site_id(&self, handle: &str) -> Option<i64> {
        self.resolve_one(
            RefCollection::Sites,
            &Value::from(handle),
            RefKey::Handle,
            RefKey::Id,
        )
        .and_then(|value| value.as_i64())
    }

    /// Look up a site's handle by internal id.
    pub fn site_handle(&self, id: i64) -> Option<String> {
        self.resolve_one(
            RefCollection::Sites,
            &Value::from(id),
            RefKey::Id,
            RefKey::Handle,
        )
        .and_then(|value| value.as_str().map(str::to_string))
    }
}

fn display_identifier(identifier: &Value) -> String {
    match identifier {
        Value::String(handle) => handle.clone(),
        other => other.to_string(),
    }
}

//! Data type registry and selector filtering
//!
//! The registry is the ordered source of truth for which data types the
//! engine knows and which mapper handles each. Callers narrow the active
//! set with an include or exclude list; entries naming unknown types are
//! surfaced as warnings with the valid set enumerated, and processing
//! continues with the valid subset. Export and import apply the same
//! policy.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::convert::ConverterSet;
use crate::mapper::RecordMapper;

/// Narrow the set of data types a pass operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    /// Every registered type
    #[default]
    All,
    /// Only the named types
    Include(Vec<String>),
    /// Every registered type except the named ones
    Exclude(Vec<String>),
}

impl Selector {
    /// Parse optional comma-separated include/exclude lists, include
    /// taking precedence when both are given.
    pub fn from_lists(include: Option<&str>, exclude: Option<&str>) -> Self {
        let split = |list: &str| {
            list.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect()
        };
        match (include, exclude) {
            (Some(include), _) => Selector::Include(split(include)),
            (None, Some(exclude)) => Selector::Exclude(split(exclude)),
            (None, None) => Selector::All,
        }
    }
}

/// Result of applying a selector: the active types in registry order and
/// any selector entries that named unknown types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub active: Vec<String>,
    pub invalid: Vec<String>,
}

/// Ordered mapping from data type handle to its mapper.
pub struct DataTypeRegistry {
    mappers: IndexMap<String, RecordMapper>,
}

impl DataTypeRegistry {
    pub fn empty() -> Self {
        Self {
            mappers: IndexMap::new(),
        }
    }

    /// The built-in type set, in import order: sites come first so the
    /// site handles later types reference are resolvable within one pass.
    pub fn builtin(converters: Arc<ConverterSet>) -> Self {
        let mut registry = Self::empty();
        for type_handle in [
            "sites",
            "fields",
            "volumes",
            "userGroups",
            "globalSets",
            "sections",
        ] {
            registry.register(RecordMapper::new(type_handle, Arc::clone(&converters)));
        }
        registry
    }

    pub fn register(&mut self, mapper: RecordMapper) {
        self.mappers.insert(mapper.type_handle().to_string(), mapper);
    }

    /// Registered type handles, in registry order.
    pub fn known_types(&self) -> Vec<String> {
        self.mappers.keys().cloned().collect()
    }

    pub fn mapper(&self, type_handle: &str) -> Option<&RecordMapper> {
        self.mappers.get(type_handle)
    }

    /// Apply a selector against the known types.
    pub fn select(&self, selector: &Selector) -> Selection {
        let known = self.known_types();
        match selector {
            Selector::All => Selection {
                active: known,
                invalid: Vec::new(),
            },
            Selector::Include(include) => Selection {
                active: known
                    .iter()
                    .filter(|handle| include.contains(*handle))
                    .cloned()
                    .collect(),
                invalid: unknown_entries(include, &known),
            },
            Selector::Exclude(exclude) => Selection {
                active: known
                    .iter()
                    .filter(|handle| !exclude.contains(*handle))
                    .cloned()
                    .collect(),
                invalid: unknown_entries(exclude, &known),
            },
        }
    }

    /// Warning text for invalid selector entries, enumerating the valid
    /// set.
    pub fn invalid_selector_warning(&self, invalid: &[String]) -> String {
        format!(
            "Invalid data type selector(s): {}. Valid types are: {}",
            invalid.join(", "),
            self.known_types().join(", ")
        )
    }
}

fn unknown_entries(entries: &[String], known: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !known.contains(*entry))
        .cloned()
        .collect()
}

//! [`InstanceBuilder`] for live-instance test scenarios.
//!
//! Builds a seeded [`MemoryHost`] the way an operator's instance would
//! look: sites, fields (plain and block-composed), sections with
//! layouts and per-site settings, volumes, user groups, global sets.

use blueprint_core::{FieldLayout, FieldLayoutTab, Host, MemoryHost, Record, SiteSetting};
use indexmap::IndexMap;
use serde_json::{Value, json};

/// Builder over a [`MemoryHost`] with one helper per record shape.
///
/// # Example
///
/// ```rust
/// use blueprint_test_utils::InstanceBuilder;
///
/// let host = InstanceBuilder::new()
///     .site("default", "Default")
///     .field("title", "Title")
///     .section("news", "News", &["title"], &["default"])
///     .build();
/// ```
#[derive(Default)]
pub struct InstanceBuilder {
    host: MemoryHost,
}

impl InstanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn site(mut self, handle: &str, name: &str) -> Self {
        self.host.seed("sites", named("site", handle, name));
        self
    }

    pub fn field(mut self, handle: &str, name: &str) -> Self {
        self.host.seed("fields", named("field", handle, name));
        self
    }

    /// A field whose `sources` attribute references already-seeded
    /// sections by id.
    pub fn field_with_sources(mut self, handle: &str, name: &str, sections: &[&str]) -> Self {
        let section_ids: Vec<i64> = sections
            .iter()
            .map(|section| self.seeded_id("sections", section))
            .collect();
        let mut record = named("field", handle, name);
        record.set_attribute("sources", Value::from(section_ids));
        self.host.seed("fields", record);
        self
    }

    /// A block-composed field with one block type per handle given.
    pub fn matrix_field(mut self, handle: &str, name: &str, block_handles: &[&str]) -> Self {
        let mut record = named("matrixField", handle, name);
        record.group = Some("Default".to_string());
        for block_handle in block_handles {
            record
                .block_types
                .push(named("matrixBlockType", block_handle, block_handle));
        }
        self.host.seed("fields", record);
        self
    }

    /// A section with a single-tab layout over the given field handles
    /// and one site setting per site handle given. Field and site
    /// handles must have been seeded earlier.
    pub fn section(
        mut self,
        handle: &str,
        name: &str,
        field_handles: &[&str],
        site_handles: &[&str],
    ) -> Self {
        let mut record = named("section", handle, name);
        record.field_layout = Some(FieldLayout {
            id: None,
            tabs: vec![FieldLayoutTab {
                name: "Content".to_string(),
                field_ids: field_handles
                    .iter()
                    .map(|field| self.seeded_id("fields", field))
                    .collect(),
            }],
        });
        for site in site_handles {
            let mut attributes = IndexMap::new();
            attributes.insert("uriFormat".to_string(), json!(format!("{}/{{slug}}", handle)));
            attributes.insert("enabledByDefault".to_string(), json!(true));
            record.site_settings.push(SiteSetting {
                site_id: self.seeded_id("sites", site),
                variant: "sectionSiteSettings".to_string(),
                attributes,
            });
        }
        self.host.seed("sections", record);
        self
    }

    pub fn volume(mut self, handle: &str, name: &str) -> Self {
        self.host.seed("volumes", named("volume", handle, name));
        self
    }

    pub fn user_group(mut self, handle: &str, name: &str) -> Self {
        self.host.seed("userGroups", named("userGroup", handle, name));
        self
    }

    pub fn global_set(mut self, handle: &str, name: &str, field_handles: &[&str]) -> Self {
        let mut record = named("globalSet", handle, name);
        record.field_layout = Some(FieldLayout {
            id: None,
            tabs: vec![FieldLayoutTab {
                name: "Globals".to_string(),
                field_ids: field_handles
                    .iter()
                    .map(|field| self.seeded_id("fields", field))
                    .collect(),
            }],
        });
        self.host.seed("globalSets", record);
        self
    }

    pub fn build(self) -> MemoryHost {
        self.host
    }

    fn seeded_id(&self, type_handle: &str, handle: &str) -> i64 {
        self.host
            .get_record(type_handle, handle)
            .and_then(|record| record.id)
            .unwrap_or_else(|| panic!("fixture references unseeded {} {}", type_handle, handle))
    }
}

fn named(variant: &str, handle: &str, name: &str) -> Record {
    let mut record = Record::new(variant, handle);
    record.set_attribute("name", json!(name));
    record
}

/// A representative instance exercising every record shape.
pub fn sample_instance() -> MemoryHost {
    InstanceBuilder::new()
        .site("default", "Default")
        .site("german", "German")
        .field("title", "Title")
        .field("body", "Body")
        .matrix_field("content", "Content", &["text", "quote"])
        .section("news", "News", &["title", "body"], &["default", "german"])
        .volume("uploads", "Uploads")
        .user_group("editors", "Editors")
        .global_set("footer", "Footer", &["body"])
        .build()
}

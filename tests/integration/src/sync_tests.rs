//! Engine-level behaviour tests across the whole component stack.

use blueprint_core::{
    Definition, Document, FieldLayout, FieldLayoutTab, Host, ImportOptions, MemoryHost, Record,
    Selector, SiteSetting, Strictness, SyncEngine,
};
use blueprint_test_utils::sample_instance;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde_json::json;

fn export_all(host: &MemoryHost) -> Document {
    let result = SyncEngine::new().export(host, &Selector::All);
    assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
    result.document
}

#[test]
fn round_trip_onto_an_empty_instance_reproduces_the_export() {
    let source = sample_instance();
    let document = export_all(&source);

    let mut fresh = MemoryHost::new();
    let report = SyncEngine::new().import(
        &mut fresh,
        &document,
        &ImportOptions {
            force: true,
            ..ImportOptions::default()
        },
    );
    assert!(report.success, "failures: {:?}", report.failures);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);

    assert_eq!(export_all(&fresh), document);
}

#[test]
fn importing_the_same_document_twice_mutates_nothing_further() {
    let mut host = sample_instance();
    let document = export_all(&host);
    let engine = SyncEngine::new();

    let first = engine.import(&mut host, &document, &ImportOptions::default());
    assert!(first.success, "failures: {:?}", first.failures);
    let after_first = export_all(&host);
    let ids_after_first: Vec<Option<i64>> =
        host.records("fields").into_iter().map(|r| r.id).collect();

    let second = engine.import(&mut host, &document, &ImportOptions::default());
    assert!(second.success, "failures: {:?}", second.failures);

    // Same portable shape, and no record was deleted and recreated.
    assert_eq!(export_all(&host), after_first);
    let ids_after_second: Vec<Option<i64>> =
        host.records("fields").into_iter().map(|r| r.id).collect();
    assert_eq!(ids_after_second, ids_after_first);
}

#[test]
fn force_deletes_only_with_the_flag_set() {
    let document = {
        // A document that mentions field A but not field B.
        let source = sample_instance();
        let mut document = export_all(&source);
        document.get_mut("fields").unwrap().shift_remove("body");
        document
    };

    // force=false: B survives, A is updated.
    let mut host = sample_instance();
    let report = SyncEngine::new().import(&mut host, &document, &ImportOptions::default());
    assert!(report.success, "failures: {:?}", report.failures);
    assert!(host.get_record("fields", "body").is_some());

    // force=true: B is deleted, A is updated.
    let mut host = sample_instance();
    let report = SyncEngine::new().import(
        &mut host,
        &document,
        &ImportOptions {
            force: true,
            ..ImportOptions::default()
        },
    );
    assert!(report.success, "failures: {:?}", report.failures);
    assert!(host.get_record("fields", "body").is_none());
    assert!(host.get_record("fields", "title").is_some());
}

#[test]
fn invalid_include_entries_warn_and_narrow_to_the_valid_subset() {
    let host = sample_instance();
    let result = SyncEngine::new().export(
        &host,
        &Selector::Include(vec!["fields".to_string(), "bogus".to_string()]),
    );

    let exported: Vec<&String> = result.document.keys().collect();
    assert_eq!(exported, vec!["fields"]);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("bogus"));
    assert!(result.warnings[0].contains("fields"));
    assert!(result.warnings[0].contains("sections"));
}

#[test]
fn two_tab_layout_and_two_site_settings_survive_the_round_trip() {
    let mut host = blueprint_test_utils::InstanceBuilder::new()
        .site("default", "Default")
        .site("german", "German")
        .field("title", "Title")
        .field("body", "Body")
        .build();

    let title_id = host.get_record("fields", "title").unwrap().id.unwrap();
    let body_id = host.get_record("fields", "body").unwrap().id.unwrap();
    let mut section = Record::new("section", "news");
    section.set_attribute("name", json!("News"));
    section.field_layout = Some(FieldLayout {
        id: None,
        tabs: vec![
            FieldLayoutTab {
                name: "Content".to_string(),
                field_ids: vec![title_id, body_id],
            },
            FieldLayoutTab {
                name: "Meta".to_string(),
                field_ids: vec![title_id],
            },
        ],
    });
    for site_handle in ["default", "german"] {
        let site_id = host.get_record("sites", site_handle).unwrap().id.unwrap();
        section.site_settings.push(SiteSetting {
            site_id,
            variant: "sectionSiteSettings".to_string(),
            attributes: IndexMap::new(),
        });
    }
    host.seed("sections", section);

    let document = export_all(&host);
    let definition = &document["sections"]["news"];
    assert_eq!(definition.field_layout.as_ref().unwrap().tabs.len(), 2);
    let site_handles: Vec<&String> = definition.site_settings.as_ref().unwrap().keys().collect();
    assert_eq!(site_handles, vec!["default", "german"]);

    let mut fresh = MemoryHost::new();
    let report = SyncEngine::new().import(&mut fresh, &document, &ImportOptions::default());
    assert!(report.success, "failures: {:?}", report.failures);

    let rebuilt = fresh.get_record("sections", "news").unwrap();
    assert_eq!(rebuilt.field_layout.as_ref().unwrap().tabs.len(), 2);
    let site_handles: Vec<String> = rebuilt
        .site_settings
        .iter()
        .map(|setting| {
            fresh
                .records("sites")
                .into_iter()
                .find(|site| site.id == Some(setting.site_id))
                .unwrap()
                .handle
        })
        .collect();
    assert_eq!(site_handles, vec!["default", "german"]);
}

#[test]
fn an_unknown_site_handle_skips_one_setting_and_the_record_still_succeeds() {
    let mut host = blueprint_test_utils::InstanceBuilder::new()
        .site("default", "Default")
        .build();

    let mut document = Document::new();
    let mut definition = Definition::new("section");
    definition.attributes.insert("name".to_string(), json!("News"));
    let mut settings = IndexMap::new();
    settings.insert("nonexistent".to_string(), Definition::new("sectionSiteSettings"));
    definition.site_settings = Some(settings);
    let mut sections = IndexMap::new();
    sections.insert("news".to_string(), definition);
    document.insert("sections".to_string(), sections);

    let report = SyncEngine::new().import(&mut host, &document, &ImportOptions::default());

    assert!(report.success, "failures: {:?}", report.failures);
    assert_eq!(report.warnings.len(), 1, "warnings: {:?}", report.warnings);
    assert!(report.warnings[0].contains("nonexistent"));
    let record = host.get_record("sections", "news").unwrap();
    assert!(record.site_settings.is_empty());
}

#[test]
fn strict_mode_turns_the_same_miss_into_a_record_failure() {
    let mut host = blueprint_test_utils::InstanceBuilder::new()
        .site("default", "Default")
        .build();

    let mut document = Document::new();
    let mut definition = Definition::new("section");
    definition.attributes.insert("name".to_string(), json!("News"));
    let mut settings = IndexMap::new();
    settings.insert("nonexistent".to_string(), Definition::new("sectionSiteSettings"));
    definition.site_settings = Some(settings);
    let mut sections = IndexMap::new();
    sections.insert("news".to_string(), definition);
    document.insert("sections".to_string(), sections);

    let report = SyncEngine::new().import(
        &mut host,
        &document,
        &ImportOptions {
            strictness: Strictness::Strict,
            ..ImportOptions::default()
        },
    );

    assert!(!report.success);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].handle, "news");
    assert!(host.get_record("sections", "news").is_none());
}

#[test]
fn field_source_references_survive_a_round_trip_onto_an_empty_instance() {
    // The fields pass runs before the sections pass, so the section the
    // sources point at does not exist yet when the field is imported.
    let source = blueprint_test_utils::InstanceBuilder::new()
        .site("default", "Default")
        .section("news", "News", &[], &[])
        .field_with_sources("related", "Related", &["news"])
        .build();
    let document = export_all(&source);

    let mut fresh = MemoryHost::new();
    let report = SyncEngine::new().import(
        &mut fresh,
        &document,
        &ImportOptions {
            force: true,
            ..ImportOptions::default()
        },
    );
    assert!(report.success, "failures: {:?}", report.failures);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);

    let section_id = fresh.get_record("sections", "news").unwrap().id.unwrap();
    let related = fresh.get_record("fields", "related").unwrap();
    assert_eq!(related.attribute("sources"), Some(&json!([section_id])));
    assert_eq!(export_all(&fresh), document);
}

#[test]
fn source_references_travel_as_handles_and_land_as_local_ids() {
    let source = blueprint_test_utils::InstanceBuilder::new()
        .site("default", "Default")
        .section("news", "News", &[], &[])
        .field_with_sources("related", "Related", &["news"])
        .build();

    let document = export_all(&source);
    assert_eq!(
        document["fields"]["related"].attribute("sources"),
        Some(&json!(["news"]))
    );

    // The target instance already has the section, under a different id.
    let mut target = blueprint_test_utils::InstanceBuilder::new()
        .site("default", "Default")
        .volume("uploads", "Uploads")
        .section("news", "News", &[], &[])
        .build();
    let report = SyncEngine::new().import(
        &mut target,
        &document,
        &ImportOptions {
            selector: Selector::Include(vec!["fields".to_string()]),
            ..ImportOptions::default()
        },
    );
    assert!(report.success, "failures: {:?}", report.failures);

    let local_section_id = target.get_record("sections", "news").unwrap().id.unwrap();
    let related = target.get_record("fields", "related").unwrap();
    assert_eq!(related.attribute("sources"), Some(&json!([local_section_id])));
}

#[test]
fn block_composed_fields_round_trip_with_their_block_types() {
    let source = sample_instance();
    let document = export_all(&source);

    let blocks = document["fields"]["content"].block_types.as_ref().unwrap();
    let handles: Vec<Option<&str>> = blocks.iter().map(|block| block.handle()).collect();
    assert_eq!(handles, vec![Some("text"), Some("quote")]);

    let mut fresh = MemoryHost::new();
    let report = SyncEngine::new().import(&mut fresh, &document, &ImportOptions::default());
    assert!(report.success, "failures: {:?}", report.failures);

    let matrix = fresh.get_record("fields", "content").unwrap();
    assert_eq!(matrix.block_types.len(), 2);
    for block in &matrix.block_types {
        assert_eq!(block.attribute("fieldId"), Some(&json!(matrix.id.unwrap())));
    }
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::error::GeneratorError;
use serde_json::{json, Value};
use std::fs;

/// Answers every template request; files that receive needles carry their markers.
struct StubSource;

impl TemplateSource for StubSource {
    fn load(&self, id: &str) -> Result<Vec<u8>> {
        let body = if id.contains("config/liquibase/master.xml") {
            "<databaseChangeLog>\n    <!-- jhipster-needle-liquibase-add-changelog -->\n    <!-- jhipster-needle-liquibase-add-constraints-changelog -->\n</databaseChangeLog>\n"
        } else if id.contains("config/CacheConfiguration.java") {
            "class CacheConfiguration {\n        // jhipster-needle-ehcache-add-entry\n}\n"
        } else {
            "// {{ baseName }}\n"
        };
        Ok(body.as_bytes().to_vec())
    }
}

fn project(answers: Value, entities: &[Value]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let document = json!({ "generator-jhipster": answers });
    fs::write(
        dir.path().join(".yo-rc.json"),
        serde_json::to_string_pretty(&document).unwrap(),
    )
    .unwrap();
    if !entities.is_empty() {
        fs::create_dir_all(dir.path().join(".jhipster")).unwrap();
        for entity in entities {
            let name = entity["name"].as_str().unwrap();
            fs::write(
                dir.path().join(".jhipster").join(format!("{name}.json")),
                entity.to_string(),
            )
            .unwrap();
        }
    }
    dir
}

fn sql_answers() -> Value {
    json!({
        "baseName": "store",
        "packageName": "io.acme.store",
        "databaseType": "sql",
        "prodDatabaseType": "postgresql",
        "cacheProvider": "ehcache",
        "enableHibernateCache": true,
        "authenticationType": "jwt",
        "buildTool": "maven",
        "jhipsterVersion": "7.9.3"
    })
}

fn order_entity() -> Value {
    json!({
        "name": "Order",
        "entityTableName": "shop_order",
        "changelogDate": "20240101000000",
        "fields": [{ "fieldName": "total", "fieldType": "BigDecimal" }],
        "relationships": [{
            "relationshipType": "many-to-one",
            "otherEntityName": "customer",
            "relationshipName": "customer"
        }]
    })
}

#[test]
fn test_sql_entity_run_registers_changelogs_and_cache() {
    let dir = project(sql_answers(), &[order_entity()]);
    let report = generate(&GenerateOptions::new(dir.path()), &StubSource).unwrap();

    assert_eq!(report.previous_version.as_deref(), Some("7.9.3"));
    assert_eq!(report.entities, vec!["Order".to_string()]);
    assert!(report.contains("src/main/java/io/acme/store/domain/Order.java"));
    assert!(report.contains(
        "src/main/resources/config/liquibase/changelog/20240101000000_added_entity_Order.xml"
    ));
    assert_eq!(report.needles.len(), 3);
    assert!(report
        .needles
        .iter()
        .all(|n| n.outcome == NeedleOutcome::Inserted));
    let recorded: Vec<&str> = report.needles.iter().map(|n| n.needle).collect();
    assert_eq!(
        recorded,
        vec![
            "liquibase-add-changelog",
            "liquibase-add-constraints-changelog",
            "ehcache-add-entry",
        ]
    );

    let master =
        fs::read_to_string(dir.path().join("src/main/resources/config/liquibase/master.xml"))
            .unwrap();
    assert!(master.contains(
        r#"    <include file="config/liquibase/changelog/20240101000000_added_entity_Order.xml" relativeToChangelogFile="false"/>"#
    ));
    assert!(master.contains("20240101000000_added_entity_constraints_Order.xml"));
    let cache = fs::read_to_string(
        dir.path()
            .join("src/main/java/io/acme/store/config/CacheConfiguration.java"),
    )
    .unwrap();
    assert!(cache.contains("createCache(cm, io.acme.store.domain.Order.class.getName());"));
}

#[test]
fn test_rerun_keeps_write_once_files_and_needles_stable() {
    let dir = project(sql_answers(), &[order_entity()]);
    generate(&GenerateOptions::new(dir.path()), &StubSource).unwrap();

    let changelog = dir
        .path()
        .join("src/main/resources/config/liquibase/changelog/20240101000000_added_entity_Order.xml");
    fs::write(&changelog, "<!-- edited by hand -->\n").unwrap();

    let second = generate(&GenerateOptions::new(dir.path()), &StubSource).unwrap();
    assert_eq!(second.previous_version.as_deref(), Some(GENERATOR_VERSION));
    assert_eq!(
        fs::read_to_string(&changelog).unwrap(),
        "<!-- edited by hand -->\n"
    );
    assert!(second.skipped_count() >= 1);

    // master.xml is re-rendered, so the entity include is inserted again exactly once
    let master =
        fs::read_to_string(dir.path().join("src/main/resources/config/liquibase/master.xml"))
            .unwrap();
    assert_eq!(master.matches("_added_entity_Order.xml").count(), 1);
}

#[test]
fn test_version_is_recorded_and_other_keys_survive() {
    let mut answers = sql_answers();
    answers["customKey"] = json!("kept");
    let dir = project(answers, &[]);
    generate(&GenerateOptions::new(dir.path()), &StubSource).unwrap();

    let document: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join(".yo-rc.json")).unwrap())
            .unwrap();
    assert_eq!(
        document["generator-jhipster"]["jhipsterVersion"],
        json!(GENERATOR_VERSION)
    );
    assert_eq!(document["generator-jhipster"]["customKey"], json!("kept"));
}

#[test]
fn test_dry_run_touches_nothing() {
    let dir = project(sql_answers(), &[order_entity()]);
    let before = fs::read_to_string(dir.path().join(".yo-rc.json")).unwrap();
    let report = generate(&GenerateOptions::new(dir.path()).dry_run(true), &StubSource).unwrap();

    assert!(report.dry_run);
    assert!(!report.files.is_empty());
    assert!(report.needles.is_empty());
    assert!(!dir.path().join("pom.xml").exists());
    assert!(!dir.path().join("src").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join(".yo-rc.json")).unwrap(),
        before
    );
}

#[test]
fn test_cleanup_runs_against_recorded_version() {
    let stale = "src/main/java/io/acme/store/web/rest/errors/ErrorVM.java";
    let dir = project(sql_answers(), &[]);
    fs::create_dir_all(dir.path().join(stale).parent().unwrap()).unwrap();
    fs::write(dir.path().join(stale), "class ErrorVM {}").unwrap();

    let kept = generate(
        &GenerateOptions::new(dir.path()).skip_cleanup(true),
        &StubSource,
    )
    .unwrap();
    assert!(kept.cleaned.is_empty());
    assert!(dir.path().join(stale).exists());

    // The previous run recorded the current version; go back to an old one
    let mut answers = sql_answers();
    answers["jhipsterVersion"] = json!("6.2.0");
    fs::write(
        dir.path().join(".yo-rc.json"),
        json!({ "generator-jhipster": answers }).to_string(),
    )
    .unwrap();
    let report = generate(&GenerateOptions::new(dir.path()), &StubSource).unwrap();
    assert!(report.cleaned.iter().any(|p| p == Path::new(stale)));
    assert!(!dir.path().join(stale).exists());
}

#[test]
fn test_validation_error_aborts_before_writing() {
    let dir = project(
        sql_answers(),
        &[json!({
            "name": "Broken",
            "changelogDate": "20240101000000",
            "fields": [{ "fieldName": "weird", "fieldType": "Widget" }]
        })],
    );
    let err = generate(&GenerateOptions::new(dir.path()), &StubSource).unwrap_err();
    assert!(matches!(err, GeneratorError::Config { .. }));
    assert!(err.to_string().contains("Widget"));
    assert!(!dir.path().join("pom.xml").exists());
}

#[test]
fn test_stale_options_are_reported_as_warnings() {
    let mut answers = sql_answers();
    answers["useYarn"] = json!(true);
    let dir = project(answers, &[]);
    let report = generate(&GenerateOptions::new(dir.path()).dry_run(true), &StubSource).unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, "stale_option");
}

#[test]
fn test_missing_yo_rc_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate(&GenerateOptions::new(dir.path()), &StubSource).unwrap_err();
    assert!(err.to_string().contains(".yo-rc.json"));
}

#[test]
fn test_application_catalog_contains_server_and_build_sections() {
    let catalog = application_catalog();
    assert!(catalog.get("serverJavaApp").is_some());
    assert!(catalog.get("global").is_some());
    assert!(catalog.get("dockerCompose").is_some());
}

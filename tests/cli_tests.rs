#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use clap::Parser;
use common::{read, write_project, write_template_tree};
use serde_json::json;
use stackgen::catalog::entity_catalog;
use stackgen::cli::{run_cli, Cli};
use stackgen::generator::application_catalog;
use std::fs;
use std::path::Path;

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["stackgen"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap()
}

fn path(p: &Path) -> String {
    p.display().to_string()
}

#[test]
fn test_generate_from_template_directory() {
    let templates = tempfile::tempdir().unwrap();
    write_template_tree(templates.path(), &[application_catalog(), entity_catalog()]);
    let project = write_project(
        json!({
            "baseName": "shop",
            "packageName": "com.acme.shop",
            "databaseType": "sql",
            "buildTool": "maven"
        }),
        &[json!({ "name": "Product", "changelogDate": "20240501000000" })],
    );
    let dir = path(project.path());
    let tpl = path(templates.path());

    run_cli(cli(&["generate", "--dir", &dir, "--templates", &tpl])).unwrap();

    let root = project.path();
    assert_eq!(
        read(root, "src/main/java/com/acme/shop/ShopApp.java"),
        "// src/main/java/package/Application.java.jinja for shop\n"
    );
    assert!(root
        .join("src/main/java/com/acme/shop/domain/Product.java")
        .exists());
    assert!(read(root, "src/main/resources/config/liquibase/master.xml")
        .contains("20240501000000_added_entity_Product.xml"));
    // Copied verbatim, so the template expression stays as written
    assert_eq!(read(root, "mvnw"), "// mvnw for {{ baseName }}\n");
    assert!(read(root, ".yo-rc.json").contains("\"jhipsterVersion\": \"8.1.0\""));
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let templates = tempfile::tempdir().unwrap();
    write_template_tree(templates.path(), &[application_catalog(), entity_catalog()]);
    let project = write_project(json!({ "packageName": "com.acme.shop" }), &[]);
    let before = read(project.path(), ".yo-rc.json");

    run_cli(cli(&[
        "generate",
        "--dir",
        &path(project.path()),
        "--templates",
        &path(templates.path()),
        "--dry-run",
    ]))
    .unwrap();

    assert!(!project.path().join("pom.xml").exists());
    assert_eq!(read(project.path(), ".yo-rc.json"), before);
}

#[test]
fn test_generate_with_incomplete_templates_fails() {
    let templates = tempfile::tempdir().unwrap();
    let project = write_project(json!({ "packageName": "com.acme.shop" }), &[]);
    let err = run_cli(cli(&[
        "generate",
        "--dir",
        &path(project.path()),
        "--templates",
        &path(templates.path()),
    ]))
    .unwrap_err();
    assert!(format!("{err:#}").contains("missing template source"));
}

#[test]
fn test_cleanup_command_removes_stale_files() {
    let project = write_project(
        json!({ "packageName": "com.acme.shop", "jhipsterVersion": "6.0.0" }),
        &[],
    );
    let stale = project
        .path()
        .join("src/main/java/com/acme/shop/web/rest/errors/ErrorVM.java");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "class ErrorVM {}").unwrap();
    let dir = path(project.path());

    run_cli(cli(&["cleanup", "--dir", &dir, "--dry-run"])).unwrap();
    assert!(stale.exists());

    run_cli(cli(&["cleanup", "--dir", &dir, "--from-version", "7.0.0"])).unwrap();
    assert!(stale.exists());

    run_cli(cli(&["cleanup", "--dir", &dir])).unwrap();
    assert!(!stale.exists());
}

#[test]
fn test_lint_reports_entity_errors() {
    let project = write_project(
        json!({ "packageName": "com.acme.shop", "databaseType": "sql" }),
        &[json!({ "name": "Order", "changelogDate": "20240101000000" })],
    );
    let dir = path(project.path());
    // `order` is a reserved table name but the default jhi prefix resolves it
    run_cli(cli(&["lint", "--dir", &dir, "--fail-on-error"])).unwrap();

    fs::write(
        project.path().join(".jhipster/Order.json"),
        json!({ "name": "Order" }).to_string(),
    )
    .unwrap();
    assert!(run_cli(cli(&["lint", "--dir", &dir, "--fail-on-error"])).is_err());
}

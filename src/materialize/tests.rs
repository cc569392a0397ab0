#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::catalog::{rename, Catalog, FileDescriptor, TemplateSpec};
use crate::config::{build_application, ApplicationConfig};
use serde_json::json;
use std::sync::Arc;

fn context(answers: serde_json::Value) -> GenerationContext {
    let config: ApplicationConfig = serde_json::from_value(answers).unwrap();
    GenerationContext::new(Arc::new(build_application(&config).unwrap()))
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn test_render_copy_and_no_ejs() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new()
        .with("README.md.jinja", "# {{ baseName }}\n")
        .with("mvnw", "#!/bin/sh {{ untouched }}\n")
        .with("banner.txt", "{{ literal }}");
    let catalog = Catalog::new().section(
        "global",
        vec![FileDescriptor::new([
            TemplateSpec::new("README.md"),
            TemplateSpec::new("mvnw").copy(),
            TemplateSpec::new("banner.txt").no_ejs(),
        ])],
    );
    let ctx = context(json!({ "baseName": "shop" }));

    let results = Materializer::new(&source, dir.path())
        .materialize(&catalog, &ctx)
        .unwrap();
    let outcomes: Vec<WriteOutcome> = results.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![WriteOutcome::Rendered, WriteOutcome::Copied, WriteOutcome::Copied]
    );
    assert_eq!(read(dir.path(), "README.md"), "# shop\n");
    assert_eq!(read(dir.path(), "mvnw"), "#!/bin/sh {{ untouched }}\n");
    assert_eq!(read(dir.path(), "banner.txt"), "{{ literal }}");
}

#[test]
fn test_destination_resolution_order() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new()
        .with("src/main/java/package/A.java.jinja", "a")
        .with("src/main/java/package/B.java.jinja", "b")
        .with("src/main/java/gitignore.jinja", "c");
    let descriptor = FileDescriptor::new([
        TemplateSpec::new("package/A.java"),
        TemplateSpec::new("package/B.java")
            .rename_to(rename(|_, file| Ok(file.replace("package/", "custom/")))),
        TemplateSpec::new("gitignore").destination("_package_/.gitignore"),
    ])
    .under("src/main/java/")
    .rename_with(rename(crate::catalog::move_to_java_package_dir));
    let catalog = Catalog::new().section("serverJavaApp", vec![descriptor]);
    let ctx = context(json!({ "packageName": "io.acme" }));

    let results = Materializer::new(&source, dir.path())
        .dry_run(true)
        .materialize(&catalog, &ctx)
        .unwrap();
    let destinations: Vec<PathBuf> = results.into_iter().map(|r| r.destination).collect();
    assert_eq!(
        destinations,
        vec![
            PathBuf::from("src/main/java/io/acme/A.java"),
            PathBuf::from("src/main/java/custom/B.java"),
            PathBuf::from("src/main/java/io/acme/.gitignore"),
        ]
    );
}

#[test]
fn test_base_path_without_trailing_slash() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new().with("docs/a.txt.jinja", "{{ baseName }}");
    let descriptor = FileDescriptor::new(["a.txt"]).under("docs");
    let entry = &descriptor.templates()[0];
    assert_eq!(template_id(&descriptor, entry), "docs/a.txt.jinja");

    let catalog = Catalog::new().section("global", vec![descriptor]);
    let results = Materializer::new(&source, dir.path())
        .materialize(&catalog, &context(json!({ "baseName": "shop" })))
        .unwrap();
    assert_eq!(results[0].destination, PathBuf::from("docs/a.txt"));
    assert_eq!(read(dir.path(), "docs/a.txt"), "shop");
}

#[test]
fn test_write_once_keeps_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new().with("changelog.xml.jinja", "generated for {{ baseName }}");
    let catalog = Catalog::new().section(
        "dbChangelog",
        vec![FileDescriptor::new([TemplateSpec::new("changelog.xml").write_once()])],
    );
    let ctx = context(json!({ "baseName": "shop" }));
    let materializer = Materializer::new(&source, dir.path());

    let first = materializer.materialize(&catalog, &ctx).unwrap();
    assert_eq!(first[0].outcome, WriteOutcome::Rendered);
    assert_eq!(read(dir.path(), "changelog.xml"), "generated for shop");

    fs::write(dir.path().join("changelog.xml"), "hand edited").unwrap();
    let second = materializer.materialize(&catalog, &ctx).unwrap();
    assert_eq!(second[0].outcome, WriteOutcome::SkippedExisting);
    assert_eq!(read(dir.path(), "changelog.xml"), "hand edited");
}

#[test]
fn test_overridable_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.yml"), "old").unwrap();
    let source = MemoryTemplateSource::new().with("app.yml.jinja", "new");
    let catalog = Catalog::new().section("dockerCompose", vec![FileDescriptor::new(["app.yml"])]);

    Materializer::new(&source, dir.path())
        .materialize(&catalog, &context(json!({})))
        .unwrap();
    assert_eq!(read(dir.path(), "app.yml"), "new");
}

#[test]
fn test_missing_template_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new().with("present.txt.jinja", "ok");
    let catalog = Catalog::new().section(
        "global",
        vec![FileDescriptor::new(["present.txt", "absent.txt"])],
    );
    let err = Materializer::new(&source, dir.path())
        .materialize(&catalog, &context(json!({})))
        .unwrap_err();
    assert!(matches!(err, GeneratorError::MissingTemplate { ref template } if template == "absent.txt.jinja"));
}

#[test]
fn test_disabled_descriptor_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // Sources for the disabled descriptor are deliberately absent
    let source = MemoryTemplateSource::new().with("on.txt.jinja", "on");
    let catalog = Catalog::new().section(
        "global",
        vec![
            FileDescriptor::new(["off-1.txt", "off-2.txt"]).when(|ctx| ctx.app().config.reactive),
            FileDescriptor::new(["on.txt"]).when(|ctx| !ctx.app().config.reactive),
        ],
    );
    let results = Materializer::new(&source, dir.path())
        .materialize(&catalog, &context(json!({})))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].destination, PathBuf::from("on.txt"));
    assert!(!dir.path().join("off-1.txt").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new().with("config/application.yml.jinja", "name: {{ baseName }}");
    let catalog = Catalog::new().section(
        "serverResource",
        vec![FileDescriptor::new(["config/application.yml"])],
    );
    let results = Materializer::new(&source, dir.path())
        .dry_run(true)
        .materialize(&catalog, &context(json!({})))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(!dir.path().join("config").exists());
}

#[test]
fn test_destination_may_not_escape_root() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new().with("x.jinja", "x");
    let catalog = Catalog::new().section(
        "global",
        vec![FileDescriptor::new([TemplateSpec::new("x").destination("../x")])],
    );
    let err = Materializer::new(&source, dir.path())
        .materialize(&catalog, &context(json!({})))
        .unwrap_err();
    assert!(err.to_string().contains("escapes the output root"));
}

#[test]
fn test_render_error_names_template() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemoryTemplateSource::new().with("broken.txt.jinja", "{% if %}");
    let catalog = Catalog::new().section("global", vec![FileDescriptor::new(["broken.txt"])]);
    let err = Materializer::new(&source, dir.path())
        .materialize(&catalog, &context(json!({})))
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Render { ref template, .. } if template == "broken.txt.jinja"));
}

#[test]
fn test_dir_source_reads_and_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::write(dir.path().join("config/app.yml.jinja"), "k: v").unwrap();
    let source = DirTemplateSource::new(dir.path());

    assert_eq!(source.load("config/app.yml.jinja").unwrap(), b"k: v".to_vec());
    assert!(matches!(
        source.load("config/missing.yml.jinja"),
        Err(GeneratorError::MissingTemplate { .. })
    ));
    assert!(matches!(
        source.load("../etc/passwd"),
        Err(GeneratorError::MissingTemplate { .. })
    ));
}

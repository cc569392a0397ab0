#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use stackgen::catalog::{predicate, Catalog, FileDescriptor, TemplateSpec};
use stackgen::config::{build_application, ApplicationConfig};
use stackgen::materialize::{Materializer, MemoryTemplateSource, WriteOutcome};
use stackgen::GenerationContext;
use std::fs;
use std::sync::Arc;

fn context(answers: serde_json::Value) -> GenerationContext {
    let config: ApplicationConfig = serde_json::from_value(answers).unwrap();
    GenerationContext::new(Arc::new(build_application(&config).unwrap()))
}

fn feature_catalogs() -> (Catalog, Catalog) {
    let base = Catalog::new().section(
        "global",
        vec![FileDescriptor::new(["README.md"])],
    );
    let reactive = Catalog::new()
        .section(
            "global",
            vec![
                FileDescriptor::new(["REACTIVE.md"]),
                FileDescriptor::new(["CLIENT.md"]).when(|ctx| !ctx.app().config.skip_client),
            ],
        )
        .gate(predicate(|ctx| ctx.app().config.reactive));
    (base, reactive)
}

fn source() -> MemoryTemplateSource {
    MemoryTemplateSource::new()
        .with("README.md.jinja", "# {{ baseName }}\n")
        .with("REACTIVE.md.jinja", "reactive\n")
        .with("CLIENT.md.jinja", "client for {{ baseName }}\n")
}

#[test]
fn test_gated_feature_area_follows_outer_and_inner_predicates() {
    let (base, reactive) = feature_catalogs();
    let merged = Catalog::merge(&[base, reactive]);
    let source = source();

    let cases = [
        (json!({ "reactive": false, "skipClient": false }), vec!["README.md"]),
        (json!({ "reactive": false, "skipClient": true }), vec!["README.md"]),
        (json!({ "reactive": true, "skipClient": true }), vec!["README.md", "REACTIVE.md"]),
        (
            json!({ "reactive": true, "skipClient": false }),
            vec!["README.md", "REACTIVE.md", "CLIENT.md"],
        ),
    ];
    for (answers, expected) in cases {
        let dir = tempfile::tempdir().unwrap();
        let written = Materializer::new(&source, dir.path())
            .materialize(&merged, &context(answers.clone()))
            .unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|w| w.destination.display().to_string())
            .collect();
        assert_eq!(names, expected, "answers={answers}");
        for name in expected {
            assert!(dir.path().join(name).exists());
        }
    }
}

#[test]
fn test_merge_leaves_inputs_untouched() {
    let (base, reactive) = feature_catalogs();
    let merged = Catalog::merge(&[base.clone(), reactive.clone()]);
    assert_eq!(base.descriptor_count(), 1);
    assert_eq!(reactive.descriptor_count(), 2);
    assert_eq!(merged.descriptor_count(), 3);
    assert_eq!(merged.sections().len(), 1);
}

#[test]
fn test_rendered_copied_and_write_once_entries() {
    let catalog = Catalog::new().section(
        "global",
        vec![FileDescriptor::new([
            TemplateSpec::new("README.md"),
            TemplateSpec::new("logo.png").copy(),
            TemplateSpec::new("CHANGELOG.md").write_once(),
        ])],
    );
    let source = MemoryTemplateSource::new()
        .with("README.md.jinja", "# {{ baseName }}\n")
        .with("logo.png", vec![0x89, b'P', b'N', b'G', 0xff])
        .with("CHANGELOG.md.jinja", "## {{ baseName }}\n");
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(json!({ "baseName": "shop" }));
    let materializer = Materializer::new(&source, dir.path());

    let first = materializer.materialize(&catalog, &ctx).unwrap();
    let outcomes: Vec<WriteOutcome> = first.iter().map(|w| w.outcome).collect();
    assert_eq!(
        outcomes,
        vec![WriteOutcome::Rendered, WriteOutcome::Copied, WriteOutcome::Rendered]
    );
    assert_eq!(fs::read_to_string(dir.path().join("README.md")).unwrap(), "# shop\n");
    assert_eq!(
        fs::read(dir.path().join("logo.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G', 0xff]
    );

    fs::write(dir.path().join("CHANGELOG.md"), "kept\n").unwrap();
    let second = materializer.materialize(&catalog, &ctx).unwrap();
    assert_eq!(second[2].outcome, WriteOutcome::SkippedExisting);
    assert_eq!(fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(), "kept\n");
}

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use serde_json::{json, Value};
use stackgen::catalog::Catalog;
use stackgen::materialize::{template_id, TemplateSource};
use stackgen::Result;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Template body for an id; files that receive needles carry their markers.
pub fn stub_body(id: &str) -> String {
    if id.contains("config/liquibase/master.xml") {
        "<databaseChangeLog>\n    <!-- jhipster-needle-liquibase-add-changelog - JHipster will add liquibase changelogs here -->\n    <!-- jhipster-needle-liquibase-add-constraints-changelog - JHipster will add liquibase constraints changelogs here -->\n</databaseChangeLog>\n".to_string()
    } else if id.contains("config/CacheConfiguration.java") {
        "public class CacheConfiguration {\n        // jhipster-needle-ehcache-add-entry\n        // jhipster-needle-caffeine-add-entry\n}\n".to_string()
    } else if id.contains("pom.xml") {
        "<project>\n    <dependencies>\n        <!-- jhipster-needle-maven-add-dependency -->\n    </dependencies>\n</project>\n".to_string()
    } else {
        format!("// {id} for {{{{ baseName }}}}\n")
    }
}

/// Answers any template request with [`stub_body`].
pub struct StubSource;

impl TemplateSource for StubSource {
    fn load(&self, id: &str) -> Result<Vec<u8>> {
        Ok(stub_body(id).into_bytes())
    }
}

/// Write every template the catalogs can request under `root`.
pub fn write_template_tree(root: &Path, catalogs: &[Catalog]) {
    for catalog in catalogs {
        for section in catalog.sections() {
            for descriptor in section.descriptors() {
                for entry in descriptor.templates() {
                    let id = template_id(descriptor, entry);
                    let path = root.join(&id);
                    fs::create_dir_all(path.parent().unwrap()).unwrap();
                    fs::write(path, stub_body(&id)).unwrap();
                }
            }
        }
    }
}

/// Project directory with `.yo-rc.json` and one `.jhipster/<name>.json` per entity.
pub fn write_project(answers: Value, entities: &[Value]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".yo-rc.json"),
        serde_json::to_string_pretty(&json!({ "generator-jhipster": answers })).unwrap(),
    )
    .unwrap();
    if !entities.is_empty() {
        fs::create_dir_all(dir.path().join(".jhipster")).unwrap();
    }
    for entity in entities {
        let name = entity["name"].as_str().unwrap();
        fs::write(
            dir.path().join(".jhipster").join(format!("{name}.json")),
            serde_json::to_string_pretty(entity).unwrap(),
        )
        .unwrap();
    }
    dir
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("reading {relative}: {e}"))
}

//! Needle consumers for the server tree.
//!
//! Each function targets one generated file and one marker that the file's
//! template is required to carry.

use super::{insert_at_needle, NeedleOutcome};
use crate::config::{Application, CacheProvider, Entity};
use crate::error::Result;
use std::path::{Path, PathBuf};

pub const MAVEN_BUILD_FILE: &str = "pom.xml";
pub const GRADLE_BUILD_FILE: &str = "build.gradle";

pub fn application_properties_path(root: &Path, app: &Application) -> PathBuf {
    root.join(&app.derived.java_dir)
        .join("config/ApplicationProperties.java")
}

pub fn logback_path(root: &Path, app: &Application) -> PathBuf {
    root.join(&app.derived.main_resource_dir)
        .join("logback-spring.xml")
}

pub fn liquibase_master_path(root: &Path, app: &Application) -> PathBuf {
    root.join(&app.derived.main_resource_dir)
        .join("config/liquibase/master.xml")
}

pub fn cache_configuration_path(root: &Path, app: &Application) -> PathBuf {
    root.join(&app.derived.java_dir)
        .join("config/CacheConfiguration.java")
}

pub fn kafka_configuration_path(root: &Path, app: &Application) -> PathBuf {
    root.join(&app.derived.java_dir)
        .join("config/KafkaConfiguration.java")
}

/// Field declaration inside `ApplicationProperties`.
pub fn add_application_property(root: &Path, app: &Application, property: &str) -> Result<NeedleOutcome> {
    insert_at_needle(
        &application_properties_path(root, app),
        "application-properties-property",
        &[property],
    )
}

pub fn add_application_property_getter(
    root: &Path,
    app: &Application,
    getter: &str,
) -> Result<NeedleOutcome> {
    insert_at_needle(
        &application_properties_path(root, app),
        "application-properties-property-getter",
        &[getter],
    )
}

/// Nested properties class inside `ApplicationProperties`.
pub fn add_application_property_class(
    root: &Path,
    app: &Application,
    class: &str,
) -> Result<NeedleOutcome> {
    insert_at_needle(
        &application_properties_path(root, app),
        "application-properties-property-class",
        &[class],
    )
}

pub fn add_logback_logger(root: &Path, app: &Application, logger: &str, level: &str) -> Result<NeedleOutcome> {
    insert_at_needle(
        &logback_path(root, app),
        "logback-add-log",
        &[format!(r#"<logger name="{logger}" level="{level}"/>"#).as_str()],
    )
}

fn include_changelog(changelog: &str) -> String {
    format!(
        r#"<include file="config/liquibase/changelog/{changelog}.xml" relativeToChangelogFile="false"/>"#
    )
}

/// Include `config/liquibase/changelog/<changelog>.xml` from the master changelog.
pub fn add_liquibase_changelog(root: &Path, app: &Application, changelog: &str) -> Result<NeedleOutcome> {
    insert_at_needle(
        &liquibase_master_path(root, app),
        "liquibase-add-changelog",
        &[include_changelog(changelog).as_str()],
    )
}

/// Include a constraints changelog, applied after every entity table exists.
pub fn add_liquibase_constraints_changelog(
    root: &Path,
    app: &Application,
    changelog: &str,
) -> Result<NeedleOutcome> {
    insert_at_needle(
        &liquibase_master_path(root, app),
        "liquibase-add-constraints-changelog",
        &[include_changelog(changelog).as_str()],
    )
}

/// Marker receiving per-entity cache entries, for providers that take them.
pub fn cache_entry_needle(provider: CacheProvider) -> Option<&'static str> {
    match provider {
        CacheProvider::Ehcache => Some("ehcache-add-entry"),
        CacheProvider::Caffeine => Some("caffeine-add-entry"),
        CacheProvider::Infinispan => Some("infinispan-add-entry"),
        CacheProvider::Redis => Some("redis-add-entry"),
        CacheProvider::Hazelcast | CacheProvider::Memcached | CacheProvider::No => None,
    }
}

/// Register the entity's second-level cache region.
///
/// Returns `None` when the configured provider has no per-entity entries.
pub fn add_entity_to_cache(root: &Path, app: &Application, entity: &Entity) -> Result<Option<NeedleOutcome>> {
    let Some(needle) = cache_entry_needle(app.config.cache_provider) else {
        return Ok(None);
    };
    let sub_package = if entity.entity_package.is_empty() {
        String::new()
    } else {
        format!("{}.", entity.entity_package)
    };
    let class = format!(
        "{}.{sub_package}domain.{}",
        app.config.package_name, entity.entity_class
    );
    insert_at_needle(
        &cache_configuration_path(root, app),
        needle,
        &[format!("createCache(cm, {class}.class.getName());").as_str()],
    )
    .map(Some)
}

pub fn add_maven_dependency(
    root: &Path,
    group_id: &str,
    artifact_id: &str,
    version: Option<&str>,
) -> Result<NeedleOutcome> {
    let mut block = vec![
        "<dependency>".to_string(),
        format!("    <groupId>{group_id}</groupId>"),
        format!("    <artifactId>{artifact_id}</artifactId>"),
    ];
    if let Some(version) = version {
        block.push(format!("    <version>{version}</version>"));
    }
    block.push("</dependency>".to_string());
    let lines: Vec<&str> = block.iter().map(String::as_str).collect();
    insert_at_needle(&root.join(MAVEN_BUILD_FILE), "maven-add-dependency", &lines)
}

/// `scope` is the Gradle configuration, e.g. `implementation` or `testImplementation`.
pub fn add_gradle_dependency(
    root: &Path,
    scope: &str,
    group_id: &str,
    artifact_id: &str,
    version: Option<&str>,
) -> Result<NeedleOutcome> {
    let coordinates = match version {
        Some(version) => format!("{group_id}:{artifact_id}:{version}"),
        None => format!("{group_id}:{artifact_id}"),
    };
    insert_at_needle(
        &root.join(GRADLE_BUILD_FILE),
        "gradle-dependency",
        &[format!(r#"{scope} "{coordinates}""#).as_str()],
    )
}

/// Bean or topic declaration inside `KafkaConfiguration`.
pub fn add_kafka_resource(root: &Path, app: &Application, declaration: &str) -> Result<NeedleOutcome> {
    insert_at_needle(&kafka_configuration_path(root, app), "kafka-add-resource", &[declaration])
}

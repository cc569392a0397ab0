//! # Configuration Validation
//!
//! Checks the stored answers and every entity record before anything is
//! written. Errors stop the run; warnings are reported and generation goes on.
//!
//! ## Checks Performed
//!
//! 1. **packageName** - must be a lowercase dotted Java package
//! 2. **Stale options** - keys written by earlier generator generations that
//!    the current loader no longer reads (flagged, never silently mapped)
//! 3. **Field types** - must be a known type or declare `fieldValues`
//! 4. **Relationships** - need a known `relationshipType` and `otherEntityName`
//! 5. **Reserved table names** - need a `jhiPrefix` or a different table name
//! 6. **Changelog dates** - SQL entities need `changelogDate` for migrations

use super::application::{is_valid_package_name, ApplicationConfig, YO_RC_FILE};
use super::entity::{EntityDefinition, ENTITIES_DIR, FIELD_TYPES, RELATIONSHIP_TYPES};
use super::options::DatabaseType;
use crate::error::GeneratorError;
use std::fmt;

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Generation cannot proceed
    Error,
    /// Reported, generation proceeds
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => f.write_str("error"),
            IssueSeverity::Warning => f.write_str("warning"),
        }
    }
}

/// A problem found in the configuration or an entity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Where the issue occurred (e.g. `.yo-rc.json:packageName`, `entity:Order`)
    pub location: String,
    pub severity: IssueSeverity,
    /// Machine-readable kind (e.g. `unknown_field_type`)
    pub kind: String,
    pub message: String,
    /// How to fix it
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        severity: IssueSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn into_error(self) -> GeneratorError {
        GeneratorError::Config {
            message: format!("{}: {}", self.location, self.message),
            hint: self.suggestion,
        }
    }
}

/// Options from earlier generator generations and what replaced them.
pub const STALE_OPTIONS: &[(&str, &str)] = &[
    ("hibernateCache", "cacheProvider"),
    ("enableHibernateCacheProvider", "enableHibernateCache"),
    ("clusteredHttpSession", "cacheProvider: hazelcast"),
    ("enableSocialSignIn", "authenticationType: oauth2"),
    ("useSass", "the client generator's own options"),
    ("authenticationTypeUaa", "authenticationType: oauth2"),
    ("useYarn", "clientPackageManager"),
    ("frontendBuilder", "clientFramework"),
];

pub fn validate_application(config: &ApplicationConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !config.package_name.is_empty() && !is_valid_package_name(&config.package_name) {
        issues.push(
            ValidationIssue::new(
                format!("{YO_RC_FILE}:packageName"),
                IssueSeverity::Error,
                "invalid_package_name",
                format!("`{}` is not a valid Java package name", config.package_name),
            )
            .with_suggestion("use a lowercase dotted package such as `com.mycompany.myapp`"),
        );
    }

    for (option, replacement) in STALE_OPTIONS {
        if config.extra.contains_key(*option) {
            issues.push(
                ValidationIssue::new(
                    format!("{YO_RC_FILE}:{option}"),
                    IssueSeverity::Warning,
                    "stale_option",
                    format!("`{option}` is no longer read by this generator and has no effect"),
                )
                .with_suggestion(format!("configure {replacement} instead and remove `{option}`")),
            );
        }
    }

    issues
}

pub fn validate_entity(
    entity: &EntityDefinition,
    config: &ApplicationConfig,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let location = format!("{ENTITIES_DIR}/{}.json", entity.name);

    for field in &entity.fields {
        if field.field_values.is_none() && !FIELD_TYPES.contains(&field.field_type.as_str()) {
            issues.push(
                ValidationIssue::new(
                    format!("{location}:{}", field.field_name),
                    IssueSeverity::Error,
                    "unknown_field_type",
                    format!(
                        "field `{}` has unrecognized type `{}`",
                        field.field_name, field.field_type
                    ),
                )
                .with_suggestion(format!(
                    "use one of {} or declare `fieldValues` for an enum",
                    FIELD_TYPES.join(", ")
                )),
            );
        }
    }

    for (index, relationship) in entity.relationships.iter().enumerate() {
        let name = relationship
            .relationship_name
            .clone()
            .unwrap_or_else(|| format!("#{index}"));
        if relationship.other_entity_name.as_deref().unwrap_or("").is_empty() {
            issues.push(
                ValidationIssue::new(
                    format!("{location}:{name}"),
                    IssueSeverity::Error,
                    "missing_other_entity",
                    format!("relationship `{name}` has no `otherEntityName`"),
                )
                .with_suggestion("name the target entity in `otherEntityName`"),
            );
        }
        match relationship.relationship_type.as_deref() {
            Some(kind) if RELATIONSHIP_TYPES.contains(&kind) => {}
            other => issues.push(
                ValidationIssue::new(
                    format!("{location}:{name}"),
                    IssueSeverity::Error,
                    "invalid_relationship_type",
                    format!(
                        "relationship `{name}` has relationshipType {}",
                        other.map_or("missing".to_string(), |k| format!("`{k}`"))
                    ),
                )
                .with_suggestion(format!("use one of {}", RELATIONSHIP_TYPES.join(", "))),
            ),
        }
    }

    let prefix_empty = config.jhi_prefix.as_deref() == Some("");
    if config.database_type == DatabaseType::Sql && entity.is_reserved_table_name() && prefix_empty
    {
        issues.push(
            ValidationIssue::new(
                location.clone(),
                IssueSeverity::Error,
                "reserved_table_name",
                format!(
                    "table name `{}` is a reserved keyword and jhiPrefix is empty",
                    entity.table_name()
                ),
            )
            .with_suggestion("specify a different table name in the entity JSON"),
        );
    }

    if config.database_type == DatabaseType::Sql && entity.changelog_date.is_none() {
        issues.push(
            ValidationIssue::new(
                location,
                IssueSeverity::Error,
                "missing_changelog_date",
                format!("entity `{}` has no changelogDate", entity.name),
            )
            .with_suggestion("add a `changelogDate` such as `20240101000000`"),
        );
    }

    issues
}

/// Validate the answers and every entity in one pass.
pub fn validate_all(config: &ApplicationConfig, entities: &[EntityDefinition]) -> Vec<ValidationIssue> {
    let mut issues = validate_application(config);
    for entity in entities {
        issues.extend(validate_entity(entity, config));
    }
    issues
}

pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == IssueSeverity::Error)
}

/// Print issues in a human-readable format
pub fn print_issues(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        println!("✅ No configuration issues found");
        return;
    }
    for issue in issues {
        let icon = match issue.severity {
            IssueSeverity::Error => "❌",
            IssueSeverity::Warning => "⚠️ ",
        };
        println!("{icon} [{}] {}: {}", issue.kind, issue.location, issue.message);
        if let Some(suggestion) = &issue.suggestion {
            println!("   💡 {suggestion}");
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();
    println!(
        "\n{} error(s), {} warning(s)",
        errors,
        issues.len() - errors
    );
}

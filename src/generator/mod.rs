//! # Generator Module
//!
//! Runs one regeneration of a project directory.
//!
//! ## Pipeline
//!
//! ```text
//! .yo-rc.json + .jhipster/*.json
//!     → validate (errors abort, warnings are reported)
//!     → compose + prepare the application record
//!     → cleanup (rules newer than the recorded jhipsterVersion)
//!     → materialize the application catalog
//!     → per entity: materialize the entity catalog, then needle insertions
//!     → record the generator version in .yo-rc.json
//! ```
//!
//! Every step runs in order on the calling thread; a failure stops the run.
//! In dry-run mode nothing on disk changes: cleanup only plans, templates are
//! rendered but not written, needles and the version update are skipped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stackgen::generator::{generate, GenerateOptions};
//! use stackgen::materialize::DirTemplateSource;
//!
//! let templates = DirTemplateSource::new("templates/server");
//! let report = generate(&GenerateOptions::new("my-app"), &templates)?;
//! println!("{} files", report.written_count());
//! ```

#[cfg(test)]
mod tests;

use crate::catalog::{build_catalog, entity_catalog, server_catalog, Catalog};
use crate::cleanup::builtin_plan;
use crate::config::{
    build_application, load_entities, validate_all, Application, Entity,
    GenerationContext, IssueSeverity, ValidationIssue, YoRc, GENERATOR_VERSION,
};
use crate::error::Result;
use crate::materialize::{Materializer, TemplateSource, WriteResult};
use crate::needle::{
    add_entity_to_cache, add_liquibase_changelog, add_liquibase_constraints_changelog,
    cache_configuration_path, cache_entry_needle, liquibase_master_path, NeedleOutcome,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// What to regenerate and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Directory holding `.yo-rc.json`; output is written here too
    pub project_dir: PathBuf,
    pub dry_run: bool,
    pub skip_cleanup: bool,
}

impl GenerateOptions {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            dry_run: false,
            skip_cleanup: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn skip_cleanup(mut self, skip_cleanup: bool) -> Self {
        self.skip_cleanup = skip_cleanup;
        self
    }
}

/// One needle insertion performed for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedleRecord {
    pub file: PathBuf,
    pub needle: &'static str,
    pub outcome: NeedleOutcome,
}

/// Everything a run did, for the CLI summary and for tests.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// `jhipsterVersion` found in `.yo-rc.json` before the run
    pub previous_version: Option<String>,
    pub dry_run: bool,
    pub warnings: Vec<ValidationIssue>,
    /// Paths removed by cleanup (planned paths in dry-run mode)
    pub cleaned: Vec<PathBuf>,
    pub files: Vec<WriteResult>,
    pub entities: Vec<String>,
    pub needles: Vec<NeedleRecord>,
}

impl GenerationReport {
    pub fn written_count(&self) -> usize {
        self.files.iter().filter(|f| f.written()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.files.len() - self.written_count()
    }

    /// Whether a file with this project-relative destination was produced.
    pub fn contains(&self, destination: impl AsRef<Path>) -> bool {
        self.files
            .iter()
            .any(|f| f.destination == destination.as_ref())
    }
}

/// Application-level catalog: server feature areas plus build and project files.
pub fn application_catalog() -> Catalog {
    Catalog::merge(&[server_catalog(), build_catalog()])
}

/// Regenerate `options.project_dir` from its stored configuration.
pub fn generate(options: &GenerateOptions, source: &dyn TemplateSource) -> Result<GenerationReport> {
    let root = options.project_dir.as_path();
    let mut yo_rc = YoRc::load(root)?;
    let answers = yo_rc.config()?;
    let definitions = load_entities(root)?;
    info!(
        project = %root.display(),
        entities = definitions.len(),
        dry_run = options.dry_run,
        "Configuration loaded"
    );

    let issues = validate_all(&answers, &definitions);
    for issue in &issues {
        warn!(kind = %issue.kind, location = %issue.location, "{}", issue.message);
    }
    if let Some(first) = issues.iter().find(|i| i.severity == IssueSeverity::Error) {
        return Err(first.clone().into_error());
    }

    let application = Arc::new(build_application(&answers)?);
    let ctx = GenerationContext::new(Arc::clone(&application));
    let mut report = GenerationReport {
        previous_version: answers.jhipster_version.clone(),
        dry_run: options.dry_run,
        warnings: issues,
        ..Default::default()
    };

    if options.skip_cleanup {
        info!("Cleanup skipped");
    } else {
        let plan = builtin_plan()?;
        let previous = report.previous_version.as_deref();
        report.cleaned = if options.dry_run {
            plan.plan(previous, &ctx)?
                .into_iter()
                .map(|p| p.path)
                .collect()
        } else {
            plan.apply(previous, &ctx, root)?
                .into_iter()
                .filter(|r| r.removed)
                .map(|r| r.path)
                .collect()
        };
    }

    let materializer = Materializer::new(source, root).dry_run(options.dry_run);
    report.files = materializer.materialize(&application_catalog(), &ctx)?;

    let entities = entity_catalog();
    for definition in &definitions {
        let entity = Arc::new(Entity::prepare(definition, &application)?);
        let entity_ctx = ctx.with_entity(Arc::clone(&entity));
        report
            .files
            .extend(materializer.materialize(&entities, &entity_ctx)?);
        if !options.dry_run {
            report
                .needles
                .extend(entity_needles(root, &application, &entity)?);
        }
        report.entities.push(entity.entity_class.clone());
    }

    if !options.dry_run {
        yo_rc.persist_version(GENERATOR_VERSION)?;
    }
    info!(
        written = report.written_count(),
        kept = report.skipped_count(),
        cleaned = report.cleaned.len(),
        needles = report.needles.len(),
        "Generation finished"
    );
    Ok(report)
}

/// Register an entity's generated files with the shared application files.
fn entity_needles(root: &Path, app: &Application, entity: &Entity) -> Result<Vec<NeedleRecord>> {
    let mut records = Vec::new();
    if app.derived.database_type_sql {
        if let Some(changelog) = entity.changelog_name("added_entity") {
            records.push(NeedleRecord {
                file: liquibase_master_path(root, app),
                needle: "liquibase-add-changelog",
                outcome: add_liquibase_changelog(root, app, &changelog)?,
            });
        }
        if entity.has_owner_side() {
            if let Some(changelog) = entity.changelog_name("added_entity_constraints") {
                records.push(NeedleRecord {
                    file: liquibase_master_path(root, app),
                    needle: "liquibase-add-constraints-changelog",
                    outcome: add_liquibase_constraints_changelog(root, app, &changelog)?,
                });
            }
        }
    }
    if app.config.enable_hibernate_cache {
        if let Some(needle) = cache_entry_needle(app.config.cache_provider) {
            if let Some(outcome) = add_entity_to_cache(root, app, entity)? {
                records.push(NeedleRecord {
                    file: cache_configuration_path(root, app),
                    needle,
                    outcome,
                });
            }
        }
    }
    Ok(records)
}

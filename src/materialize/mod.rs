//! # Materialize Module
//!
//! Walks a merged [`Catalog`] and writes every template whose descriptor is
//! enabled for the given [`GenerationContext`].
//!
//! For each enabled template entry:
//!
//! 1. **Source**: descriptor path + template file, plus [`TEMPLATE_SUFFIX`]
//!    when the entry is rendered.
//! 2. **Destination**: descriptor path + the first of `destinationFile`, the
//!    entry's rename function, the descriptor's rename function, or the
//!    naming convention in [`convention_destination`].
//! 3. **Override**: an entry whose override predicate is false leaves an
//!    existing destination untouched.
//! 4. **Write**: render with minijinja, or copy bytes unchanged.
//!
//! A template the source cannot provide aborts the run.

mod source;
#[cfg(test)]
mod tests;

pub use source::{DirTemplateSource, MemoryTemplateSource, TemplateSource, TEMPLATE_SUFFIX};

use crate::catalog::{
    convention_destination, substitute_placeholders, Catalog, FileDescriptor, TemplateEntry,
    WriteMethod,
};
use crate::config::GenerationContext;
use crate::error::{GeneratorError, Result};
use minijinja::Environment;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// What happened to one destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Rendered,
    Copied,
    /// Destination existed and the override predicate refused replacement
    SkippedExisting,
}

/// One template of an enabled descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub section: String,
    /// Template identity as requested from the source
    pub source: String,
    /// Relative to the output root
    pub destination: PathBuf,
    pub outcome: WriteOutcome,
}

impl WriteResult {
    pub fn written(&self) -> bool {
        self.outcome != WriteOutcome::SkippedExisting
    }
}

/// Writes catalogs into an output root.
pub struct Materializer<'a> {
    source: &'a dyn TemplateSource,
    output_root: PathBuf,
    dry_run: bool,
    env: Environment<'static>,
}

impl<'a> Materializer<'a> {
    pub fn new(source: &'a dyn TemplateSource, output_root: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        Self {
            source,
            output_root: output_root.into(),
            dry_run: false,
            env,
        }
    }

    /// Evaluate everything but leave the filesystem untouched.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Materialize `catalog` under `ctx`, in section then descriptor order.
    pub fn materialize(&self, catalog: &Catalog, ctx: &GenerationContext) -> Result<Vec<WriteResult>> {
        let render_ctx = ctx.render_value()?;
        let mut results = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for section in catalog.sections() {
            for descriptor in section.descriptors() {
                if !descriptor.is_enabled(ctx) {
                    debug!(
                        section = section.name(),
                        templates = ?descriptor.templates().iter().map(TemplateEntry::source_file).collect::<Vec<_>>(),
                        "Descriptor disabled"
                    );
                    continue;
                }
                for entry in descriptor.templates() {
                    let result =
                        self.write_entry(section.name(), descriptor, entry, ctx, &render_ctx)?;
                    if !seen.insert(result.destination.clone()) {
                        warn!(
                            destination = %result.destination.display(),
                            source = %result.source,
                            "Destination written more than once, later template wins"
                        );
                    }
                    results.push(result);
                }
            }
        }

        info!(
            files = results.len(),
            skipped = results.iter().filter(|r| !r.written()).count(),
            dry_run = self.dry_run,
            "Catalog materialized"
        );
        Ok(results)
    }

    fn write_entry(
        &self,
        section: &str,
        descriptor: &FileDescriptor,
        entry: &TemplateEntry,
        ctx: &GenerationContext,
        render_ctx: &Value,
    ) -> Result<WriteResult> {
        let spec = entry.spec();
        let copy = is_copied(entry);
        let source_id = template_id(descriptor, entry);
        let destination = destination(descriptor, entry, ctx)?;
        let target = self.output_root.join(&destination);

        // Loaded even when skipped so a missing template is always fatal.
        let bytes = self.source.load(&source_id)?;

        let refuses_override = spec
            .and_then(|s| s.override_when.as_ref())
            .is_some_and(|may_override| !may_override(ctx));
        if refuses_override && target.exists() {
            debug!(destination = %destination.display(), "Keeping existing file");
            return Ok(WriteResult {
                section: section.to_string(),
                source: source_id,
                destination,
                outcome: WriteOutcome::SkippedExisting,
            });
        }

        let (contents, outcome) = if copy {
            (bytes, WriteOutcome::Copied)
        } else {
            let text = String::from_utf8(bytes).map_err(|_| GeneratorError::Render {
                template: source_id.clone(),
                source: minijinja::Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    "template is not valid UTF-8",
                ),
            })?;
            let rendered = self
                .env
                .render_named_str(&source_id, &text, render_ctx)
                .map_err(|source| GeneratorError::Render {
                    template: source_id.clone(),
                    source,
                })?;
            (rendered.into_bytes(), WriteOutcome::Rendered)
        };

        if !self.dry_run {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e))?;
            }
            fs::write(&target, contents).map_err(|e| GeneratorError::io(&target, e))?;
        }
        debug!(source = %source_id, destination = %destination.display(), ?outcome, "Template written");

        Ok(WriteResult {
            section: section.to_string(),
            source: source_id,
            destination,
            outcome,
        })
    }
}

fn is_copied(entry: &TemplateEntry) -> bool {
    entry
        .spec()
        .is_some_and(|s| s.method == WriteMethod::Copy || s.no_ejs)
}

/// `base` joined to `file` with exactly one `/`, whether or not `base` ends with one.
fn under_base(base: &str, file: &str) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{file}")
    } else {
        format!("{base}/{file}")
    }
}

/// Identity requested from the [`TemplateSource`] for one entry.
pub fn template_id(descriptor: &FileDescriptor, entry: &TemplateEntry) -> String {
    let mut id = under_base(descriptor.path(), entry.source_file());
    if !is_copied(entry) {
        id.push_str(TEMPLATE_SUFFIX);
    }
    id
}

/// Destination relative to the output root.
pub fn destination(
    descriptor: &FileDescriptor,
    entry: &TemplateEntry,
    ctx: &GenerationContext,
) -> Result<PathBuf> {
    let file = entry.source_file();
    let spec = entry.spec();
    let relative = if let Some(destination) = spec.and_then(|s| s.destination_file.as_deref()) {
        substitute_placeholders(ctx, destination)?
    } else if let Some(rename) = spec
        .and_then(|s| s.rename_to.as_ref())
        .or(descriptor.rename_to())
    {
        rename(ctx, file)?
    } else {
        convention_destination(ctx, file)?
    };

    let joined = PathBuf::from(under_base(descriptor.path(), &relative));
    if relative.is_empty()
        || !joined
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(GeneratorError::Rename {
            template: file.to_string(),
            reason: format!("destination `{}` escapes the output root", joined.display()),
        });
    }
    Ok(joined)
}

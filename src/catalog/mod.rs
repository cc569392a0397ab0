//! # Catalog Module
//!
//! Declarative description of what a generation run may write.
//!
//! ## Overview
//!
//! - A [`FileDescriptor`] names one or more templates and an optional
//!   predicate over the [`GenerationContext`]. A false predicate drops the
//!   whole descriptor.
//! - A [`Section`] is a named, ordered list of descriptors.
//! - A [`Catalog`] maps section names to sections, in insertion order.
//!
//! Feature areas (base, SQL, MongoDB, JWT, Maven, ...) each contribute a
//! catalog. [`Catalog::merge`] concatenates same-named sections in argument
//! order and [`Catalog::gate`] ANDs one predicate into every descriptor of a
//! catalog, so a whole feature area can be switched on or off at once:
//!
//! ```rust
//! use stackgen::catalog::{predicate, Catalog, FileDescriptor};
//!
//! let mongo = Catalog::new()
//!     .section("serverJavaConfig", vec![FileDescriptor::new(["package/config/DatabaseConfiguration.java"])])
//!     .gate(predicate(|ctx| ctx.app().derived.database_type_mongodb));
//! let base = Catalog::new()
//!     .section("serverJavaConfig", vec![FileDescriptor::new(["package/config/WebConfigurer.java"])]);
//!
//! let merged = Catalog::merge(&[base, mongo]);
//! assert_eq!(merged.get("serverJavaConfig").map(|s| s.descriptors().len()), Some(2));
//! ```
//!
//! Catalogs are plain data. Nothing here reads the configuration except the
//! predicates and rename functions stored inside descriptors.

mod build;
mod entity;
mod rename;
mod server;

pub use build::build_catalog;
pub use entity::entity_catalog;
pub use rename::{
    convention_destination, move_to_java_entity_package_dir, move_to_java_package_dir,
    substitute_placeholders,
};
pub use server::{
    base_catalog, cache_catalog, cassandra_catalog, couchbase_catalog, jwt_catalog,
    kafka_catalog, mongodb_catalog, neo4j_catalog, oauth2_catalog, server_catalog,
    session_catalog, sql_catalog, user_management_catalog,
};

use crate::config::GenerationContext;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Inclusion test evaluated against the live context.
pub type Predicate = Arc<dyn Fn(&GenerationContext) -> bool + Send + Sync>;

/// Maps a template-relative path to its destination, relative to the
/// descriptor's base path.
pub type RenameFn = Arc<dyn Fn(&GenerationContext, &str) -> Result<String> + Send + Sync>;

/// Wrap a closure as a [`Predicate`].
pub fn predicate<F>(f: F) -> Predicate
where
    F: Fn(&GenerationContext) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`RenameFn`].
pub fn rename<F>(f: F) -> RenameFn
where
    F: Fn(&GenerationContext, &str) -> Result<String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// `outer && inner`, with an absent inner predicate counting as true.
pub fn and(outer: Predicate, inner: Option<Predicate>) -> Predicate {
    match inner {
        None => outer,
        Some(inner) => Arc::new(move |ctx: &GenerationContext| outer(ctx) && inner(ctx)),
    }
}

/// How a template reaches its destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMethod {
    /// Render with the template engine (source carries the template suffix)
    #[default]
    Render,
    /// Byte-for-byte copy, no interpolation
    Copy,
}

/// Template entry with per-file overrides.
#[derive(Clone, Default)]
pub struct TemplateSpec {
    pub source_file: String,
    pub destination_file: Option<String>,
    pub rename_to: Option<RenameFn>,
    /// When present and false, an existing destination is left untouched
    pub override_when: Option<Predicate>,
    pub method: WriteMethod,
    /// Source has no template suffix and is copied without interpolation
    pub no_ejs: bool,
}

impl TemplateSpec {
    pub fn new(source_file: impl Into<String>) -> Self {
        TemplateSpec {
            source_file: source_file.into(),
            ..Default::default()
        }
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination_file = Some(destination.into());
        self
    }

    pub fn rename_to(mut self, rename: RenameFn) -> Self {
        self.rename_to = Some(rename);
        self
    }

    pub fn override_when(mut self, predicate: Predicate) -> Self {
        self.override_when = Some(predicate);
        self
    }

    /// Never replace the destination once it exists.
    pub fn write_once(self) -> Self {
        self.override_when(predicate(|_| false))
    }

    pub fn copy(mut self) -> Self {
        self.method = WriteMethod::Copy;
        self
    }

    pub fn no_ejs(mut self) -> Self {
        self.no_ejs = true;
        self
    }
}

impl fmt::Debug for TemplateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSpec")
            .field("source_file", &self.source_file)
            .field("destination_file", &self.destination_file)
            .field("rename_to", &self.rename_to.is_some())
            .field("override_when", &self.override_when.is_some())
            .field("method", &self.method)
            .field("no_ejs", &self.no_ejs)
            .finish()
    }
}

/// One template of a descriptor: a bare relative path or a full spec.
#[derive(Clone, Debug)]
pub enum TemplateEntry {
    File(String),
    Spec(TemplateSpec),
}

impl TemplateEntry {
    pub fn source_file(&self) -> &str {
        match self {
            TemplateEntry::File(file) => file,
            TemplateEntry::Spec(spec) => &spec.source_file,
        }
    }

    pub fn spec(&self) -> Option<&TemplateSpec> {
        match self {
            TemplateEntry::File(_) => None,
            TemplateEntry::Spec(spec) => Some(spec),
        }
    }
}

impl From<&str> for TemplateEntry {
    fn from(file: &str) -> Self {
        TemplateEntry::File(file.to_string())
    }
}

impl From<String> for TemplateEntry {
    fn from(file: String) -> Self {
        TemplateEntry::File(file)
    }
}

impl From<TemplateSpec> for TemplateEntry {
    fn from(spec: TemplateSpec) -> Self {
        TemplateEntry::Spec(spec)
    }
}

/// Candidate output files guarded by an optional predicate.
#[derive(Clone, Default)]
pub struct FileDescriptor {
    condition: Option<Predicate>,
    path: Option<String>,
    templates: Vec<TemplateEntry>,
    rename_to: Option<RenameFn>,
}

impl FileDescriptor {
    pub fn new<I, T>(templates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TemplateEntry>,
    {
        FileDescriptor {
            templates: templates.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Only include the descriptor when `f` holds.
    pub fn when<F>(mut self, f: F) -> Self
    where
        F: Fn(&GenerationContext) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(predicate(f));
        self
    }

    pub fn with_condition(mut self, condition: Option<Predicate>) -> Self {
        self.condition = condition;
        self
    }

    /// Base directory shared by source and destination.
    pub fn under(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn rename_with(mut self, rename: RenameFn) -> Self {
        self.rename_to = Some(rename);
        self
    }

    pub fn condition(&self) -> Option<&Predicate> {
        self.condition.as_ref()
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }

    pub fn templates(&self) -> &[TemplateEntry] {
        &self.templates
    }

    pub fn rename_to(&self) -> Option<&RenameFn> {
        self.rename_to.as_ref()
    }

    /// Evaluate the predicate; an absent predicate includes the descriptor.
    pub fn is_enabled(&self, ctx: &GenerationContext) -> bool {
        self.condition.as_ref().map_or(true, |condition| condition(ctx))
    }
}

impl fmt::Debug for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDescriptor")
            .field("conditional", &self.condition.is_some())
            .field("path", &self.path)
            .field("templates", &self.templates)
            .field("rename_to", &self.rename_to.is_some())
            .finish()
    }
}

/// Named, ordered list of descriptors.
#[derive(Clone, Debug, Default)]
pub struct Section {
    name: String,
    descriptors: Vec<FileDescriptor>,
}

impl Section {
    pub fn new(name: impl Into<String>, descriptors: Vec<FileDescriptor>) -> Self {
        Section {
            name: name.into(),
            descriptors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptors(&self) -> &[FileDescriptor] {
        &self.descriptors
    }
}

/// Section name → section, kept in first-insertion order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    sections: Vec<Section>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append descriptors to `name`, creating the section on first use.
    pub fn section(mut self, name: &str, descriptors: Vec<FileDescriptor>) -> Self {
        self.append(name, descriptors);
        self
    }

    fn append(&mut self, name: &str, descriptors: Vec<FileDescriptor>) {
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(section) => section.descriptors.extend(descriptors),
            None => self.sections.push(Section::new(name, descriptors)),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.descriptors.is_empty())
    }

    /// Total number of descriptors across sections.
    pub fn descriptor_count(&self) -> usize {
        self.sections.iter().map(|s| s.descriptors.len()).sum()
    }

    /// Concatenate catalogs section by section, in argument order.
    ///
    /// Inputs are not modified; descriptors are cloned (predicates are shared).
    pub fn merge(catalogs: &[Catalog]) -> Catalog {
        let mut merged = Catalog::new();
        for catalog in catalogs {
            for section in &catalog.sections {
                merged.append(&section.name, section.descriptors.clone());
            }
        }
        merged
    }

    /// New catalog whose every descriptor also requires `outer`.
    pub fn gate(&self, outer: Predicate) -> Catalog {
        let sections = self
            .sections
            .iter()
            .map(|section| Section {
                name: section.name.clone(),
                descriptors: section
                    .descriptors
                    .iter()
                    .map(|descriptor| {
                        let condition = and(Arc::clone(&outer), descriptor.condition.clone());
                        descriptor.clone().with_condition(Some(condition))
                    })
                    .collect(),
            })
            .collect();
        Catalog { sections }
    }
}

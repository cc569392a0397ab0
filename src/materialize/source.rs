use crate::error::{GeneratorError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Suffix carried by templates that are rendered rather than copied.
pub const TEMPLATE_SUFFIX: &str = ".jinja";

/// Where template bytes come from.
pub trait TemplateSource {
    /// Load a template by its catalog-relative identity.
    ///
    /// A missing template is [`GeneratorError::MissingTemplate`].
    fn load(&self, id: &str) -> Result<Vec<u8>>;
}

/// Template tree on disk.
#[derive(Debug, Clone)]
pub struct DirTemplateSource {
    root: PathBuf,
}

impl DirTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirTemplateSource {
    fn load(&self, id: &str) -> Result<Vec<u8>> {
        let relative = Path::new(id);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(GeneratorError::MissingTemplate {
                template: id.to_string(),
            });
        }
        let path = self.root.join(relative);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(GeneratorError::MissingTemplate {
                template: id.to_string(),
            }),
            Err(e) => Err(GeneratorError::io(path, e)),
        }
    }
}

/// Templates held in memory, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateSource {
    templates: BTreeMap<String, Vec<u8>>,
}

impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.templates.insert(id.into(), contents.into());
    }

    pub fn with(mut self, id: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(id, contents);
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for MemoryTemplateSource {
    fn load(&self, id: &str) -> Result<Vec<u8>> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| GeneratorError::MissingTemplate {
                template: id.to_string(),
            })
    }
}

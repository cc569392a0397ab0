//! Error taxonomy for a generation run.
//!
//! Every variant is fatal to the run that raised it. Nothing here is retried:
//! the output is regenerable source code, so the generator stops at the first
//! failure and the user re-runs from a clean or version-controlled tree.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the catalog, materializer, cleanup, and needle engines.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The configuration (or an entity record) cannot drive a generation.
    #[error("configuration error: {message}{}", hint_suffix(.hint))]
    Config {
        message: String,
        /// Remediation shown to the user
        hint: Option<String>,
    },

    /// A descriptor referenced a template that the source does not provide.
    #[error("missing template source `{template}`")]
    MissingTemplate { template: String },

    /// A rename function refused the template path it was given.
    #[error("cannot rename `{template}`: {reason}")]
    Rename { template: String, reason: String },

    /// A path placeholder needs data the active context does not carry.
    #[error("placeholder `{placeholder}` in `{template}` requires {requires}")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
        requires: &'static str,
    },

    /// A consumer asked for a marker the target file does not contain.
    #[error("Missing required needle `jhipster-needle-{needle}` in {}", .path.display())]
    MissingNeedle { path: PathBuf, needle: String },

    /// A needle insertion was requested with nothing to insert.
    #[error("needle `jhipster-needle-{needle}` requires at least one content line")]
    NoNeedleContent { needle: String },

    #[error("template rendering failed for `{template}`: {source}")]
    Render {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("invalid version `{version}`: {source}")]
    Version {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({hint})"),
        None => String::new(),
    }
}

impl GeneratorError {
    pub fn config(message: impl Into<String>) -> Self {
        GeneratorError::Config {
            message: message.into(),
            hint: None,
        }
    }

    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        GeneratorError::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GeneratorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_carries_hint() {
        let err = GeneratorError::config_with_hint(
            "table name `user` is reserved",
            "specify a different table name in the entity JSON",
        );
        assert_eq!(
            err.to_string(),
            "configuration error: table name `user` is reserved (specify a different table name in the entity JSON)"
        );
        assert_eq!(
            GeneratorError::config("bad").to_string(),
            "configuration error: bad"
        );
    }

    #[test]
    fn test_missing_needle_message() {
        let err = GeneratorError::MissingNeedle {
            path: PathBuf::from("pom.xml"),
            needle: "maven-add-dependency".into(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required needle `jhipster-needle-maven-add-dependency` in pom.xml"
        );
    }
}

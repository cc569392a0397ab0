//! # Needle Module
//!
//! In-place insertion at named marker comments of already generated files.
//!
//! A needle is a line containing `jhipster-needle-<name>`. Content is
//! inserted on the lines directly above the marker, indented like the marker
//! line, and the marker stays so later insertions keep working.
//!
//! Insertion is idempotent. Before inserting, the block between the previous
//! needle (or the top of the file) and the target marker is compared with the
//! candidate content as whitespace-separated token sequences; a match means
//! the block is already there, whatever its indentation or line wrapping.

mod server;

pub use server::{
    add_application_property, add_application_property_class, add_application_property_getter,
    add_entity_to_cache, add_gradle_dependency, add_kafka_resource, add_liquibase_changelog,
    add_liquibase_constraints_changelog, add_logback_logger, add_maven_dependency,
    application_properties_path, cache_configuration_path, cache_entry_needle,
    kafka_configuration_path, liquibase_master_path, logback_path, GRADLE_BUILD_FILE,
    MAVEN_BUILD_FILE,
};

use crate::error::{GeneratorError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Prefix shared by every marker.
pub const NEEDLE_PREFIX: &str = "jhipster-needle-";

/// Result of splicing content into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Splice {
    Inserted(String),
    AlreadyPresent,
}

/// Result of [`insert_at_needle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedleOutcome {
    Inserted,
    AlreadyPresent,
}

/// Insert `content` above the `needle` marker of the file at `path`.
///
/// The file must exist and contain the marker. Each `content` item may span
/// several lines.
pub fn insert_at_needle(path: &Path, needle: &str, content: &[&str]) -> Result<NeedleOutcome> {
    let text = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
    match splice(path, &text, needle, content)? {
        Splice::Inserted(updated) => {
            fs::write(path, updated).map_err(|e| GeneratorError::io(path, e))?;
            debug!(path = %path.display(), needle, "Needle content inserted");
            Ok(NeedleOutcome::Inserted)
        }
        Splice::AlreadyPresent => {
            debug!(path = %path.display(), needle, "Needle content already present");
            Ok(NeedleOutcome::AlreadyPresent)
        }
    }
}

/// Pure form of [`insert_at_needle`]. `origin` only labels errors.
pub fn splice(origin: &Path, text: &str, needle: &str, content: &[&str]) -> Result<Splice> {
    let block = content_lines(content);
    if block.is_empty() {
        return Err(GeneratorError::NoNeedleContent {
            needle: needle.to_string(),
        });
    }

    let marker = marker_regex(needle)?;
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let index = lines
        .iter()
        .position(|line| marker.is_match(line))
        .ok_or_else(|| GeneratorError::MissingNeedle {
            path: origin.to_path_buf(),
            needle: needle.to_string(),
        })?;

    let region_start = lines[..index]
        .iter()
        .rposition(|line| line.contains(NEEDLE_PREFIX))
        .map_or(0, |previous| previous + 1);
    let region: Vec<&str> = lines[region_start..index]
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect();
    let candidate: Vec<&str> = block.iter().flat_map(|line| line.split_whitespace()).collect();
    if contains_run(&region, &candidate) {
        return Ok(Splice::AlreadyPresent);
    }

    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let marker_line = lines[index];
    let indent: &str = &marker_line[..marker_line.len() - marker_line.trim_start().len()];

    let mut out = String::with_capacity(text.len() + block.iter().map(|l| l.len() + 8).sum::<usize>());
    for line in &lines[..index] {
        out.push_str(line);
    }
    for line in &block {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push_str(newline);
    }
    for line in &lines[index..] {
        out.push_str(line);
    }
    Ok(Splice::Inserted(out))
}

fn marker_regex(needle: &str) -> Result<Regex> {
    if needle.trim().is_empty() || needle.chars().any(char::is_whitespace) {
        return Err(GeneratorError::config(format!("invalid needle name `{needle}`")));
    }
    // The name must end at a non-name character so `foo` does not match `foo-bar`.
    Regex::new(&format!(r"{}{}(?:[^\w-]|$)", NEEDLE_PREFIX, regex::escape(needle)))
        .map_err(|e| GeneratorError::config(format!("invalid needle name `{needle}`: {e}")))
}

/// Content split into lines and dedented to a common left margin.
///
/// Returns no lines when there is nothing but whitespace.
fn content_lines(content: &[&str]) -> Vec<String> {
    let raw: Vec<&str> = content
        .iter()
        .flat_map(|item| item.lines())
        .map(|line| line.trim_end())
        .collect();
    let first = raw.iter().position(|l| !l.is_empty());
    let last = raw.iter().rposition(|l| !l.is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };
    let raw = &raw[first..=last];
    let margin = raw
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    raw.iter()
        .map(|l| l.get(margin..).unwrap_or_else(|| l.trim_start()).to_string())
        .collect()
}

fn contains_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

//! # stackgen
//!
//! **stackgen** regenerates a Spring Boot application tree from the answers
//! persisted in `.yo-rc.json` and the entity records under `.jhipster/`.
//!
//! ## Overview
//!
//! Output files are declared, not coded. Each feature area contributes a
//! [`catalog::Catalog`] of named sections; each section lists file
//! descriptors gated by a predicate over the generation context. A run merges
//! the catalogs, evaluates every predicate against one immutable context, and
//! renders or copies the selected templates into the project.
//!
//! ## Architecture
//!
//! - **[`config`]** - `.yo-rc.json` answers, derived flags, entity records, validation
//! - **[`catalog`]** - File descriptors, sections, catalogs, `merge` and `gate`
//! - **[`materialize`]** - Template sources and the file writer (rename, override, copy)
//! - **[`cleanup`]** - Version-gated removal of files older generators produced
//! - **[`needle`]** - Idempotent insertion at `jhipster-needle-*` markers
//! - **[`generator`]** - The regeneration pipeline tying the above together
//! - **[`cli`]** - Command-line front end
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(stackgen generate)
//!     participant Config as config
//!     participant Cleanup as cleanup
//!     participant Mat as materialize
//!     participant Needle as needle
//!     participant FS as File System
//!
//!     CLI->>Config: YoRc::load + load_entities
//!     Config->>Config: validate_all
//!     Config->>Config: compose → prepare
//!     Config-->>CLI: GenerationContext
//!     CLI->>Cleanup: builtin_plan().apply(jhipsterVersion)
//!     Cleanup->>FS: remove stale files
//!     CLI->>Mat: materialize(server + build catalogs)
//!     Mat->>FS: render / copy templates
//!     loop every entity
//!         CLI->>Mat: materialize(entity catalog)
//!         CLI->>Needle: changelog + cache entries
//!         Needle->>FS: insert above markers
//!     end
//!     CLI->>FS: persist jhipsterVersion
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`error::Result`] with a [`GeneratorError`]; the
//! CLI wraps those in `anyhow` with context. Every error ends the run.

pub mod catalog;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod materialize;
pub mod needle;

pub use catalog::{Catalog, FileDescriptor, Section, TemplateSpec};
pub use config::{Application, ApplicationConfig, Entity, GenerationContext};
pub use error::{GeneratorError, Result};
pub use generator::{generate, GenerateOptions, GenerationReport};
pub use materialize::{DirTemplateSource, Materializer, TemplateSource};

//! # CLI Module
//!
//! Command-line front end of the generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Regenerate a project from its `.yo-rc.json` and `.jhipster/*.json`:
//!
//! ```bash
//! stackgen generate --dir my-app --templates templates/server
//! ```
//!
//! Options:
//! - `--dir <DIR>` - Project directory (default: current directory)
//! - `--templates <DIR>` - Template root (or `STACKGEN_TEMPLATES_DIR`)
//! - `--dry-run` - Render without writing, removing, or inserting
//! - `--skip-cleanup` - Leave files dropped by newer generator versions
//!
//! ### `lint`
//!
//! Validate the stored configuration and entity records:
//!
//! ```bash
//! stackgen lint --dir my-app --fail-on-error
//! ```
//!
//! ### `needle`
//!
//! Insert content at a marker of an existing file:
//!
//! ```bash
//! stackgen needle --file pom.xml --needle maven-add-dependency \
//!     --content '<dependency><groupId>org.acme</groupId></dependency>'
//! ```
//!
//! ### `cleanup`
//!
//! Run the upgrade cleanup table on its own:
//!
//! ```bash
//! stackgen cleanup --dir my-app --from-version 6.10.5 --dry-run
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use stackgen::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};

//! Generator settings read from the environment.
//!
//! ## Environment Variables
//!
//! ### `STACKGEN_TEMPLATES_DIR`
//!
//! Template root used when `--templates` is not given on the command line.
//!
//! ### `STACKGEN_DRY_RUN`
//!
//! `true`/`1` makes every `generate` invocation a dry run.

use std::env;
use std::path::PathBuf;

/// Version recorded in `.yo-rc.json` after a successful run and compared by
/// the cleanup table on the next one.
pub const GENERATOR_VERSION: &str = "8.1.0";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub templates_dir: Option<PathBuf>,
    pub dry_run: bool,
}

impl GeneratorSettings {
    pub fn from_env() -> Self {
        let templates_dir = env::var("STACKGEN_TEMPLATES_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let dry_run = match env::var("STACKGEN_DRY_RUN") {
            Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => false,
        };
        GeneratorSettings {
            templates_dir,
            dry_run,
        }
    }
}

use crate::cleanup::builtin_plan;
use crate::config::{
    build_application, load_entities, print_issues, validate_all, GenerationContext,
    GeneratorSettings, IssueSeverity, YoRc,
};
use crate::generator::{generate, GenerateOptions, GenerationReport};
use crate::materialize::DirTemplateSource;
use crate::needle::{insert_at_needle, NeedleOutcome};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line interface for stackgen
///
/// Regenerates a Spring Boot project tree from its `.yo-rc.json` and
/// `.jhipster/` entity records.
#[derive(Parser, Debug)]
#[command(name = "stackgen")]
#[command(about = "Predicate-driven project scaffolding", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate the project from its stored configuration
    Generate {
        /// Project directory containing `.yo-rc.json`
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Template root (falls back to STACKGEN_TEMPLATES_DIR)
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Render everything but write nothing
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Keep files that older generator versions produced
        #[arg(long, default_value_t = false)]
        skip_cleanup: bool,
    },
    /// Check `.yo-rc.json` and the entity records without generating
    ///
    /// Reports invalid package names, unknown field types, reserved table
    /// names, malformed relationships, and options that are no longer read.
    Lint {
        /// Project directory containing `.yo-rc.json`
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Insert content above a `jhipster-needle-<name>` marker of a file
    Needle {
        /// File carrying the marker
        #[arg(short, long)]
        file: PathBuf,

        /// Marker name without the `jhipster-needle-` prefix
        #[arg(short, long)]
        needle: String,

        /// Content to insert; each value may span several lines
        #[arg(short, long, num_args = 1.., required = true)]
        content: Vec<String>,
    },
    /// Remove files that generator versions newer than the recorded one dropped
    Cleanup {
        /// Project directory containing `.yo-rc.json`
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Version to upgrade from (default: jhipsterVersion in `.yo-rc.json`)
        #[arg(long)]
        from_version: Option<String>,

        /// List what would be removed without removing it
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

/// Execute the parsed command
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or validated, a
/// template is missing, a needle marker is absent, or the filesystem refuses
/// a write.
pub fn run_cli(cli: Cli) -> Result<()> {
    let settings = GeneratorSettings::from_env();
    match cli.command {
        Commands::Generate {
            dir,
            templates,
            dry_run,
            skip_cleanup,
        } => {
            let Some(templates) = templates.or(settings.templates_dir) else {
                bail!("no template root given; pass --templates or set STACKGEN_TEMPLATES_DIR");
            };
            let options = GenerateOptions::new(&dir)
                .dry_run(dry_run || settings.dry_run)
                .skip_cleanup(skip_cleanup);
            let source = DirTemplateSource::new(&templates);
            let report = generate(&options, &source)
                .with_context(|| format!("Failed to generate project in {}", dir.display()))?;
            print_report(&report);
            Ok(())
        }
        Commands::Lint {
            dir,
            fail_on_error,
            errors_only,
        } => {
            let yo_rc = YoRc::load(&dir)?;
            let answers = yo_rc.config()?;
            let entities = load_entities(&dir)?;
            let mut issues = validate_all(&answers, &entities);
            if errors_only {
                issues.retain(|i| i.severity == IssueSeverity::Error);
            }
            print_issues(&issues);
            let errors = issues
                .iter()
                .filter(|i| i.severity == IssueSeverity::Error)
                .count();
            if fail_on_error && errors > 0 {
                bail!("{errors} configuration error(s) in {}", dir.display());
            }
            Ok(())
        }
        Commands::Needle {
            file,
            needle,
            content,
        } => {
            let lines: Vec<&str> = content.iter().map(String::as_str).collect();
            let outcome = insert_at_needle(&file, &needle, &lines)
                .with_context(|| format!("Failed to update {}", file.display()))?;
            match outcome {
                NeedleOutcome::Inserted => {
                    println!("✅ Inserted at jhipster-needle-{needle} in {}", file.display())
                }
                NeedleOutcome::AlreadyPresent => println!(
                    "⚠️  Skipping {}: content already present at jhipster-needle-{needle}",
                    file.display()
                ),
            }
            Ok(())
        }
        Commands::Cleanup {
            dir,
            from_version,
            dry_run,
        } => run_cleanup(&dir, from_version, dry_run || settings.dry_run),
    }
}

fn run_cleanup(dir: &Path, from_version: Option<String>, dry_run: bool) -> Result<()> {
    let answers = YoRc::load(dir)?.config()?;
    let previous = from_version.or_else(|| answers.jhipster_version.clone());
    let ctx = GenerationContext::new(Arc::new(build_application(&answers)?));
    let plan = builtin_plan()?;

    if dry_run {
        let planned = plan.plan(previous.as_deref(), &ctx)?;
        for removal in &planned {
            println!(
                "🧹 Would remove {} (dropped in {})",
                removal.path.display(),
                removal.threshold
            );
        }
        println!("✅ {} path(s) planned for removal", planned.len());
        return Ok(());
    }

    let removals = plan
        .apply(previous.as_deref(), &ctx, dir)
        .with_context(|| format!("Failed to clean up {}", dir.display()))?;
    let removed: Vec<_> = removals.iter().filter(|r| r.removed).collect();
    for removal in &removed {
        println!("🧹 Removed {}", removal.path.display());
    }
    println!("✅ Removed {} stale path(s)", removed.len());
    Ok(())
}

fn print_report(report: &GenerationReport) {
    for issue in &report.warnings {
        println!("⚠️  {}: {}", issue.location, issue.message);
    }
    for path in &report.cleaned {
        if report.dry_run {
            println!("🧹 Would remove {}", path.display());
        } else {
            println!("🧹 Removed {}", path.display());
        }
    }
    for file in report.files.iter().filter(|f| !f.written()) {
        println!(
            "⚠️  Skipping {} (exists and is not regenerated)",
            file.destination.display()
        );
    }
    let verb = if report.dry_run { "Would write" } else { "Wrote" };
    println!(
        "✅ {verb} {} file(s) for {} entit{}",
        report.written_count(),
        report.entities.len(),
        if report.entities.len() == 1 { "y" } else { "ies" }
    );
    let inserted = report
        .needles
        .iter()
        .filter(|n| n.outcome == NeedleOutcome::Inserted)
        .count();
    if inserted > 0 {
        println!("✅ Inserted {inserted} needle block(s)");
    }
}

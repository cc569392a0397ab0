use clap::Parser;
use stackgen::cli::{run_cli, Cli};

fn main() -> anyhow::Result<()> {
    stackgen::logging::init_logging()?;
    run_cli(Cli::parse())
}

use air_quality::cli::{run, Cli};
use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("air-quality failed")
}

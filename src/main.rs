// ABOUTME: Main entry point for the cranio-deck program.
// ABOUTME: Provides CLI interface and runs the deck build from the library.

use anyhow::Context;
use clap::Parser;
use env_logger::{Env, Target};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the generated PPTX file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for downloaded images
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Build a text-only deck without network access
    #[arg(long)]
    offline: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let cli = Cli::parse();
    let config = cranio_deck::Config::from_env().with_overrides(
        cli.output,
        cli.images_dir,
        cli.timeout_secs,
        cli.offline,
    );

    let summary = cranio_deck::build_presentation(&config)
        .with_context(|| format!("Failed to build {}", config.output_path.display()))?;

    println!("Saved: {}", summary.output_path.display());
    Ok(())
}

//! protowiki CLI
//!
//! Thin wrapper around the library: parse arguments, set up logging, load
//! configuration and hand off to [`protowiki::generate`].

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use anyhow::Context;
use clap::Parser;
use protowiki::core::DEFAULT_CONFIG_FILE;
use protowiki::WikiConfig;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Generate wiki documentation from decompiled protocol sources
#[derive(Parser, Debug)]
#[command(name = "protowiki")]
#[command(about = "Generate wiki documentation from protocol Java files")]
struct Cli {
    /// Directory containing the full protocol package (with packets/ subdirectory)
    #[arg(long = "protocol-dir", value_name = "DIR", default_value = "./protocol")]
    protocol_dir: PathBuf,

    /// Output directory for wiki pages
    #[arg(long = "output-dir", value_name = "DIR", default_value = "./wiki")]
    output_dir: PathBuf,

    /// Version string for documentation
    #[arg(long = "version", value_name = "LABEL", default_value = "unknown")]
    version: String,

    /// Also generate JSON summary
    #[arg(long = "json")]
    json: bool,

    /// Config file path (default: <protocol-dir>/.protowiki.json when present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit config file must load; a discovered one falls back to defaults
fn load_config(explicit: Option<&Path>, protocol_dir: &Path) -> anyhow::Result<WikiConfig> {
    if let Some(path) = explicit {
        return WikiConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }
    match WikiConfig::load_or_default(protocol_dir) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("Ignoring {}: {}", protocol_dir.join(DEFAULT_CONFIG_FILE).display(), e);
            Ok(WikiConfig::default())
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), &cli.protocol_dir)?;

    info!("Parsing protocol from: {}", cli.protocol_dir.display());
    info!("Output directory: {}", cli.output_dir.display());
    info!("Version: {}", cli.version);

    let summary = protowiki::generate(
        &cli.protocol_dir,
        &cli.output_dir,
        &cli.version,
        &config,
        cli.json,
    )?;

    info!("Wiki generation complete: {}", summary);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

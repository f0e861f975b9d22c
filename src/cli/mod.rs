//! Command-line interface for repo-to-chunks

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::render::{render_summary, write_report};
use crate::walk::TreeChunker;

mod utils;

use utils::{normalize_single_dash_longs, parse_csv};

/// Split a directory tree into fixed-size text chunks for size-limited prompts
#[derive(Parser, Debug)]
#[command(name = "repo-to-chunks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to read files from
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory to write chunk files into (created if missing)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Chunk size in KiB [default: 13]
    #[arg(
        short = 's',
        long = "chunksize",
        visible_alias = "chunk-size",
        value_name = "KIB",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub chunksize: Option<u64>,

    /// Include only paths matching these globs (comma-separated)
    #[arg(short = 'i', long, value_name = "GLOBS")]
    pub include: Option<String>,

    /// Exclude paths matching these globs (comma-separated); **/.git/** is always excluded
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude: Option<String>,

    /// Path to config file (repo-to-chunks.toml or .repo-to-chunks.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Follow symbolic links when walking
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do not write chunk_report.json
    #[arg(long)]
    pub no_report: bool,

    /// Omit the timestamp from chunk_report.json
    #[arg(long)]
    pub no_timestamp: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse_from(normalize_single_dash_longs(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors exit with 1; --help and --version exit with 0.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let file_config =
        load_config(&cli.source, cli.config.as_deref()).context("Failed to load configuration")?;

    let overrides = CliOverrides {
        chunk_size_kib: cli.chunksize,
        include_patterns: parse_csv(&cli.include),
        exclude_patterns: parse_csv(&cli.exclude),
        follow_symlinks: if cli.follow_symlinks { Some(true) } else { None },
        write_report: if cli.no_report { Some(false) } else { None },
        timestamp: if cli.no_timestamp { Some(false) } else { None },
    };
    let config = merge_cli_with_config(file_config, overrides);

    let report = TreeChunker::from_config(&cli.source, &cli.output, &config)
        .run()
        .context("Error processing files")?;

    let report_path = if config.write_report {
        Some(write_report(&report, &config, config.timestamp)?)
    } else {
        None
    };

    println!("{}", render_summary(&report, report_path.as_deref()));
    Ok(())
}

use anyhow::Context;
use clap::{CommandFactory, Parser};
use pardiff_common::{load_config, ColorMode, DiffConfig, DiffError};
use pardiff_core::{ComparisonScheduler, LocalVfs, WriterSink};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_MIXED_TYPES: i32 = 1;
const EXIT_FAULT: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "pardiff")]
#[command(author = "pardiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Compare two files or two directories in parallel", long_about = None)]
#[command(after_help = "Report lines are printed as comparisons finish, in no fixed order.")]
struct Cli {
    /// Two files or two directories to compare
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Descend into common subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Skip entries matching a gitignore-style pattern (can be specified multiple times)
    #[arg(short = 'x', long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Classify listed symlinks by their target
    #[arg(short = 'L', long)]
    follow_symlinks: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Disable ANSI colors in output
    #[arg(long)]
    no_color: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    // Logs go to stderr; stdout carries only report lines.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.paths.len() != 2 {
        if let Err(e) = Cli::command().print_help() {
            error!("Failed to print help: {}", e);
        }
        return;
    }

    if let Err(e) = run(cli) {
        match e.downcast_ref::<DiffError>() {
            Some(err) if err.is_usage() => {
                println!("Cannot compare between a file and a directory.");
                std::process::exit(EXIT_MIXED_TYPES);
            }
            _ => {
                error!("Comparison failed: {:#}", e);
                std::process::exit(EXIT_FAULT);
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let loaded = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = loaded.path.as_ref().filter(|_| loaded.exists) {
        info!("Using config {}", path.display());
    }

    let mut config = loaded.config;
    apply_overrides(&mut config, &cli);

    let use_color = config.color.enabled(std::io::stdout().is_terminal());
    let sink = Arc::new(WriterSink::new(std::io::stdout(), use_color));
    let scheduler = ComparisonScheduler::from_config(&config, Arc::new(LocalVfs::new()), sink)?;

    let summary = scheduler.run(&cli.paths[0], &cli.paths[1])?;
    info!(
        "Compared {} files ({} differ) across {} directories",
        summary.files_compared, summary.files_differ, summary.dirs_compared
    );

    Ok(())
}

/// Command-line flags win over file values; unset flags leave the file value alone.
fn apply_overrides(config: &mut DiffConfig, cli: &Cli) {
    if cli.recursive {
        config.recursive = true;
    }
    if cli.follow_symlinks {
        config.follow_symlinks = true;
    }
    if cli.no_color {
        config.color = ColorMode::Never;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    config.exclude.extend(cli.exclude.iter().cloned());
}

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modplan_core::AnalysisSession;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "modplan")]
#[command(
    about = "Plan symbol renames and module moves for JavaScript and TypeScript projects",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Project root; relative paths in commands resolve against it
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Path to config file (skips config discovery)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan renaming the symbol at a position
    Rename {
        /// File containing the symbol
        file: PathBuf,

        /// Zero-based line
        line: usize,

        /// Zero-based character, in UTF-16 code units
        character: usize,

        /// New name for the symbol
        new_name: String,

        /// Also rename occurrences inside string literals
        #[arg(long)]
        strings: bool,

        /// Also rename occurrences inside comments
        #[arg(long)]
        comments: bool,
    },

    /// Plan moving a single file
    MoveFile {
        old_path: PathBuf,
        new_path: PathBuf,
    },

    /// Plan moving a directory and every project file under it
    MoveDir { old_dir: PathBuf, new_dir: PathBuf },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

fn main() -> Result<()> {
    // stdout carries the plan; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let session = open_session(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Rename {
            file,
            line,
            character,
            new_name,
            strings,
            comments,
        } => {
            let options = commands::rename::Options {
                file,
                line,
                character,
                new_name,
                strings,
                comments,
            };
            commands::rename::run(&session, options, cli.format)?;
        }
        Commands::MoveFile { old_path, new_path } => {
            commands::move_file::run(&session, old_path, new_path, cli.format)?;
        }
        Commands::MoveDir { old_dir, new_dir } => {
            commands::move_dir::run(&session, old_dir, new_dir, cli.format)?;
        }
    }

    Ok(())
}

fn open_session(root: &Path, config_path: Option<&Path>) -> Result<AnalysisSession> {
    match config_path {
        Some(path) => {
            let config = modplan_config::load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            AnalysisSession::with_config(root, &config).context("Failed to open project")
        }
        None => AnalysisSession::open(root).context("Failed to open project"),
    }
}

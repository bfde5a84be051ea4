//! CLI entry point for tasklist.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use tasklist_app::{ProjectConfig, TaskStore};
use tasklist_core::{StatusFilter, TaskId};
use tasklist_store::{FileStore, TaskPersistence};

mod commands;

/// A small task list kept in a local data directory.
#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "tasklist: add, filter and tick off tasks")]
struct Cli {
    /// Directory holding the stored task list.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory searched for `.tasklist/config.toml` (defaults to current).
    #[arg(long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task.
    Add {
        /// Task text (at most 100 characters).
        text: String,
    },

    /// Mark a task completed, or reopen it.
    Toggle {
        /// Task id.
        id: TaskId,
    },

    /// Delete a task.
    Rm {
        /// Task id.
        id: TaskId,
    },

    /// Replace a task's text.
    Edit {
        /// Task id.
        id: TaskId,
        /// New text (at most 100 characters).
        text: String,
    },

    /// List tasks.
    Ls {
        /// Completion filter.
        #[arg(long, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Case-insensitive substring to search for.
        #[arg(long)]
        search: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Show task totals.
    Counts,

    /// Delete every task.
    Clear {
        /// Confirm deleting every task.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli {
        data_dir,
        config_dir,
        cmd,
    } = Cli::parse();

    install_tracing();

    let config_dir = config_dir.unwrap_or_else(|| PathBuf::from("."));
    execute_command(&config_dir, data_dir, cmd)
}

fn execute_command(config_dir: &Path, data_dir: Option<PathBuf>, command: Command) -> Result<()> {
    let config = ProjectConfig::from_workdir(config_dir)?;
    let data_dir = resolve_data_dir(data_dir, &config)?;
    let file_store = FileStore::open(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    let persistence = TaskPersistence::with_key(file_store, config.storage.key())?;
    let mut store = TaskStore::hydrate(persistence);
    commands::run(command, &mut store, &mut std::io::stdout().lock())
}

fn resolve_data_dir(flag: Option<PathBuf>, config: &ProjectConfig) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = config.storage.data_dir() {
        return Ok(dir.to_path_buf());
    }
    dirs::data_dir()
        .map(|dir| dir.join("tasklist"))
        .ok_or_else(|| anyhow!("no data directory available; pass --data-dir"))
}

fn install_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// RUST_LOG directives, falling back to WARN so command output stays clean.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

//! Command-line interface for tasklist
//!
//! This module defines the CLI structure using clap derive macros.
//! Non-interactive subcommands live in `task`; `ui` hands over to the
//! terminal front end.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::storage::{self, FileStore};
use crate::task::TaskRepository;

mod config;
mod task;

/// tasklist - a terminal task list
///
/// Add short tasks, mark them complete, delete them and search them.
/// Runs the interactive UI when no subcommand is given.
#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding tasks, config and logs (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKLIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to a config file (defaults to <data dir>/tasklist.toml)
    #[arg(long, global = true, env = "TASKLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the interactive task list (default)
    Ui,

    /// Add a task
    Add {
        /// Task text (words are joined with spaces)
        text: Vec<String>,
    },

    /// List tasks
    List {
        /// Only show tasks containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Toggle completion of the task at a position
    Toggle {
        /// 1-based position as shown by `list`
        position: usize,
    },

    /// Delete the task at a position
    Delete {
        /// 1-based position as shown by `list`
        position: usize,
    },

    /// Print the number of pending tasks
    Count,

    /// Remove every stored task
    Clear,

    /// Show the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        write: bool,
    },
}

/// Resolved environment shared by subcommands
pub(crate) struct Context {
    pub(crate) data_dir: PathBuf,
    pub(crate) config_path: PathBuf,
    pub(crate) config: Config,
    pub(crate) options: OutputOptions,
}

impl Context {
    pub(crate) fn open(&self) -> Result<Controller<FileStore>> {
        open_controller(&self.data_dir, &self.config)
    }
}

impl Cli {
    /// Subcommand to run, `ui` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Ui)
    }

    /// Whether the terminal UI will take over the screen
    pub fn is_interactive(&self) -> bool {
        matches!(self.command(), Commands::Ui)
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        storage::resolve_data_dir(self.data_dir.as_deref())
    }

    fn load_config(&self, data_dir: &Path) -> Result<Config> {
        match self.config.as_deref() {
            Some(path) => Config::load(path).map_err(|err| match err {
                Error::InvalidConfig(_) => err,
                other => Error::InvalidConfig(format!("{}: {other}", path.display())),
            }),
            None => Ok(Config::load_from_dir(data_dir)),
        }
    }

    /// Run the selected command
    pub fn run(self) -> Result<()> {
        let data_dir = self.resolve_data_dir()?;
        let config = self.load_config(&data_dir)?;
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| storage::config_file(&data_dir));
        let ctx = Context {
            data_dir,
            config_path,
            config,
            options: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        };

        match self.command() {
            Commands::Ui => {
                let controller = ctx.open()?;
                crate::ui::task_list::run(controller, ctx.config.ui.clone())
            }
            Commands::Add { text } => task::run_add(&ctx, text),
            Commands::List { search } => task::run_list(&ctx, search),
            Commands::Toggle { position } => task::run_toggle(&ctx, position),
            Commands::Delete { position } => task::run_delete(&ctx, position),
            Commands::Count => task::run_count(&ctx),
            Commands::Clear => task::run_clear(&ctx),
            Commands::Config { write } => config::run_config(&ctx, write),
        }
    }
}

/// Open the file-backed task list described by `config`
pub fn open_controller(data_dir: &Path, config: &Config) -> Result<Controller<FileStore>> {
    let store = FileStore::new(config.storage.store_dir(data_dir));
    let repo = TaskRepository::with_key(store, config.storage.key.clone());
    Controller::startup(repo)
}

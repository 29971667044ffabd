//! tasklist - terminal task list CLI
//!
//! Add short tasks, mark them complete, delete them and search them, either
//! through the interactive UI or one subcommand at a time.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tasklist::cli::Cli;
use tasklist::output::{emit_error, infer_command_name_from_args};
use tasklist::storage;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

fn main() {
    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    init_tracing(&cli);

    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}

// Ignore invalid/huge RUST_LOG values instead of failing startup.
fn env_filter() -> EnvFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn init_tracing(cli: &Cli) {
    if !cli.is_interactive() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(env_filter())
            .init();
        return;
    }

    // The UI owns the screen, so logs go to a file or nowhere.
    let Some(file) = cli
        .resolve_data_dir()
        .ok()
        .and_then(|dir| open_log_file(&dir))
    else {
        return;
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter())
        .init();
}

fn open_log_file(data_dir: &Path) -> Option<File> {
    fs::create_dir_all(data_dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(storage::log_file(data_dir))
        .ok()
}

//! tasklist - terminal task list library
//!
//! Keeps an ordered list of short tasks, persists it as a JSON array in a
//! key-value store and projects it into display rows for the terminal UI.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `tasklist.toml`
//! - `controller`: Task list state and the operations that mutate it
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output for CLI commands
//! - `storage`: Key-value stores and data directory layout
//! - `task`: Task records and their persistence
//! - `ui`: Terminal front end built on ratatui

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod output;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{Error, Result};

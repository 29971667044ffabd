#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated data directory for one test
pub struct TestDataDir {
    dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn read_tasks(&self) -> Option<String> {
        fs::read_to_string(self.tasks_file()).ok()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = tasklist_cmd();
        cmd.arg("--data-dir").arg(self.path());
        cmd
    }
}

pub fn tasklist_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tasklist").expect("binary");
    cmd.env_remove("TASKLIST_DATA_DIR")
        .env_remove("TASKLIST_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

//! Test utilities for creating scratch Python scripts.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding scripts under test.
///
/// Cleaned up automatically when dropped.
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file under the directory, creating parent directories as
    /// needed.
    pub fn add_script(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(name);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write script");
        full_path
    }
}

impl Default for ScriptDir {
    fn default() -> Self {
        Self::new()
    }
}

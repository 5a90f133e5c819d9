//! [`TestProject`] - a temporary directory used as an OpenSpec project root.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helpers for building tool arguments.
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a directory with the `openspec/` layout OpenSpec's `init` produces.
    pub fn initialized() -> Self {
        let project = Self::new();
        fs::create_dir_all(project.root().join("openspec/specs")).unwrap();
        fs::create_dir_all(project.root().join("openspec/changes")).unwrap();
        fs::write(project.root().join("openspec/project.md"), "# Project\n").unwrap();
        project
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The root as a `directory` argument string.
    pub fn directory_arg(&self) -> String {
        self.root().display().to_string()
    }

    /// A path under the root that is guaranteed not to exist.
    pub fn missing_dir(&self) -> PathBuf {
        self.root().join("does-not-exist")
    }
}

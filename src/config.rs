//! Solver configuration.
//!
//! Resolution order, later wins:
//! 1. built-in defaults (`./main` in the current directory, `input.txt`,
//!    `output.txt`)
//! 2. a JSON file passed with `--config`
//! 3. `$SPLINE_SOLVER_PATH` and `$SPLINE_WORK_DIR`
//! 4. command-line flags

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable overriding the solver executable.
pub const SOLVER_PATH_ENV: &str = "SPLINE_SOLVER_PATH";

/// Environment variable overriding the working directory.
pub const WORK_DIR_ENV: &str = "SPLINE_WORK_DIR";

pub const DEFAULT_EXECUTABLE: &str = "./main";
pub const DEFAULT_REQUEST_FILE: &str = "input.txt";
pub const DEFAULT_RESPONSE_FILE: &str = "output.txt";

/// Where the solver lives and which files it talks through.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Solver executable, invoked with no arguments. Relative paths with a
    /// directory part are resolved against `work_dir` and made absolute; bare
    /// names are looked up on `PATH`.
    pub executable: PathBuf,
    /// Directory the solver runs in and the files live in.
    pub work_dir: PathBuf,
    pub request_file: String,
    pub response_file: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            work_dir: PathBuf::from("."),
            request_file: DEFAULT_REQUEST_FILE.to_string(),
            response_file: DEFAULT_RESPONSE_FILE.to_string(),
        }
    }
}

impl SolverConfig {
    /// Config rooted at `work_dir` with the default executable and file names.
    pub fn in_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Apply environment overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Apply environment overrides from an arbitrary lookup.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        if let Some(executable) = lookup(SOLVER_PATH_ENV) {
            tracing::debug!("Using {}={}", SOLVER_PATH_ENV, executable.display());
            self.executable = executable;
        }
        if let Some(work_dir) = lookup(WORK_DIR_ENV) {
            tracing::debug!("Using {}={}", WORK_DIR_ENV, work_dir.display());
            self.work_dir = work_dir;
        }
        self
    }

    /// Executable path as it should be handed to the OS.
    ///
    /// Paths with a directory part come back absolute, so the launch does not
    /// depend on whether the child changes into `work_dir` before `exec`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is needed and unavailable.
    pub fn resolved_executable(&self) -> io::Result<PathBuf> {
        let has_dir = self.executable.components().count() > 1;
        if self.executable.is_relative() && has_dir {
            std::path::absolute(self.work_dir.join(&self.executable))
        } else {
            Ok(self.executable.clone())
        }
    }

    pub fn request_path(&self) -> PathBuf {
        self.work_dir.join(&self.request_file)
    }

    pub fn response_path(&self) -> PathBuf {
        self.work_dir.join(&self.response_file)
    }
}

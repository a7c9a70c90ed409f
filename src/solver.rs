//! External solver invocation.
//!
//! The solver is a separate executable that talks to us only through two
//! files in its working directory:
//!
//! ```text
//! ┌────────────────┐  input.txt   ┌─────────────────┐
//! │ ExternalSolver │ ───────────► │ solver (./main) │
//! │                │ ◄─────────── │                 │
//! └────────────────┘  output.txt  └─────────────────┘
//! ```
//!
//! An invocation runs `Validating → Encoding → Invoking → Decoding` and ends
//! in `Succeeded` or `Failed`. It blocks the calling thread throughout and
//! has no timeout. The files are not locked, so callers must not run two
//! invocations against the same working directory at once.

use std::fs;
use std::io;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::codec::write_request_file;
use crate::config::SolverConfig;
use crate::error::{Error, ExecutionFailure, Result};
use crate::models::{InterpolationRequest, RawRequest, SolverResult, Stage};

// =============================================================================
// Service Trait for Dependency Injection
// =============================================================================

/// The one operation a front-end needs.
///
/// Front-ends depend on this trait rather than on [`ExternalSolver`] so they
/// can be tested without a solver executable.
pub trait SolverService {
    /// Validate, encode, run the solver and decode its response.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the invocation; see [`Error`].
    fn compute(&self, request: &RawRequest) -> Result<SolverResult>;
}

/// Runs the configured solver executable.
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    config: SolverConfig,
}

impl ExternalSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Run an already validated request through the solver.
    ///
    /// # Errors
    ///
    /// Returns `RequestWriteFailed`, `ResponseClearFailed`,
    /// `SolverExecutionFailed`, `ResponseFileMissing` or `ResponseReadFailed`.
    pub fn run(&self, request: &InterpolationRequest) -> Result<SolverResult> {
        enter(Stage::Encoding);
        write_request_file(&self.config.request_path(), request)?;

        enter(Stage::Invoking);
        self.clear_stale_response()?;
        self.invoke()?;

        enter(Stage::Decoding);
        self.read_response()
    }

    /// Launch the solver and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `SolverExecutionFailed` if the process cannot be spawned or
    /// exits with a non-zero status (or is killed by a signal).
    pub fn invoke(&self) -> Result<()> {
        let executable =
            self.config
                .resolved_executable()
                .map_err(|e| Error::SolverExecutionFailed {
                    executable: self.config.executable.clone(),
                    cause: ExecutionFailure::Launch(e),
                })?;
        info!("Running solver {}", executable.display());

        // Solver chatter goes to our stderr; stdout carries results only
        let status = Command::new(&executable)
            .current_dir(&self.config.work_dir)
            .stdout(Stdio::from(io::stderr()))
            .status()
            .map_err(|e| {
                warn!("Failed to launch solver {}: {}", executable.display(), e);
                Error::SolverExecutionFailed {
                    executable: executable.clone(),
                    cause: ExecutionFailure::Launch(e),
                }
            })?;

        if !status.success() {
            warn!("Solver {} exited with {}", executable.display(), status);
            return Err(Error::SolverExecutionFailed {
                executable,
                cause: ExecutionFailure::Status(status),
            });
        }

        debug!("Solver exited with {}", status);
        Ok(())
    }

    /// Read the response file left by a successful run.
    ///
    /// # Errors
    ///
    /// Returns `ResponseFileMissing` if the file does not exist and
    /// `ResponseReadFailed` for any other I/O or UTF-8 failure.
    pub fn read_response(&self) -> Result<SolverResult> {
        let path = self.config.response_path();
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "Response file read");
                Ok(SolverResult::from_response(&text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::ResponseFileMissing(path)),
            Err(source) => Err(Error::ResponseReadFailed { path, source }),
        }
    }

    /// Remove a response file left over from a previous run, so a solver that
    /// writes nothing is reported as `ResponseFileMissing` instead of
    /// returning the old text.
    fn clear_stale_response(&self) -> Result<()> {
        let path = self.config.response_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Removed stale response file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::ResponseClearFailed { path, source }),
        }
    }
}

impl SolverService for ExternalSolver {
    fn compute(&self, request: &RawRequest) -> Result<SolverResult> {
        enter(Stage::Validating);
        let outcome = request.validate().and_then(|validated| self.run(&validated));

        match &outcome {
            Ok(result) => {
                enter(Stage::Succeeded);
                info!("Solver returned {} bytes", result.text().len());
            }
            Err(e) => {
                enter(Stage::Failed);
                debug!(stage = %e.stage(), kind = ?e.kind(), "Invocation failed: {}", e);
            }
        }
        outcome
    }
}

fn enter(stage: Stage) {
    debug!(stage = %stage, "Invocation stage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn solver_in(dir: &std::path::Path) -> ExternalSolver {
        ExternalSolver::new(SolverConfig::in_dir(dir))
    }

    #[test]
    fn test_read_response_trims() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("output.txt"), "\n4.125\n\n").unwrap();

        let result = solver_in(dir.path()).read_response().unwrap();
        assert_eq!(result.text(), "4.125");
    }

    #[test]
    fn test_read_response_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = solver_in(dir.path()).read_response().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseFileMissing);
    }

    #[test]
    fn test_read_response_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("output.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let err = solver_in(dir.path()).read_response().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseReadFailed);
    }

    #[test]
    fn test_read_response_directory_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("output.txt")).unwrap();

        let err = solver_in(dir.path()).read_response().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseReadFailed);
    }

    #[test]
    fn test_compute_validation_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let solver = solver_in(dir.path());

        let raw = RawRequest::new("2", "2", "1 2 3", "1 2 3 4", "1 2");
        let err = solver.compute(&raw).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
        assert_eq!(err.stage(), Stage::Validating);
        assert!(!dir.path().join("input.txt").exists());
    }

    #[test]
    fn test_unremovable_stale_response_fails_before_launch() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("output.txt");
        fs::create_dir(&stale).unwrap();
        fs::write(stale.join("keep"), "x").unwrap();
        let solver = solver_in(dir.path());

        let raw = RawRequest::new("1", "2", "1 2", "3 4", "1.5");
        let err = solver.compute(&raw).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResponseClearFailed);
        assert_eq!(err.stage(), Stage::Invoking);
        assert!(stale.join("keep").exists());
    }

    #[test]
    fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let solver = solver_in(dir.path());

        let raw = RawRequest::new("1", "3", "1 2 3", "2 3 5", "2.5");
        let err = solver.compute(&raw).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SolverExecutionFailed);
        assert!(matches!(
            err,
            Error::SolverExecutionFailed {
                cause: ExecutionFailure::Launch(_),
                ..
            }
        ));
        // The request is written before the launch is attempted.
        assert_eq!(
            fs::read_to_string(dir.path().join("input.txt")).unwrap(),
            "1\n3\n1 2 3\n2 3 5\n2.5\n"
        );
    }
}

//! Error taxonomy for the solver protocol.
//!
//! Every failure is terminal for the invocation it happened in. Front-ends
//! show the `Display` text to the user and can branch on [`Error::kind`].

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use serde::Serialize;
use thiserror::Error;

use crate::models::{Series, Stage};

/// Protocol errors, one variant per user-visible failure category.
#[derive(Debug, Error)]
pub enum Error {
    /// Node count is not a positive integer.
    #[error("Node count must be a positive integer, got {0:?}")]
    InvalidNodeCount(String),

    /// Mode outside {1, 2, 3}.
    #[error("Unsupported mode {0:?}, expected 1, 2 or 3")]
    UnsupportedMode(String),

    /// Wrong number of tokens in one of the series.
    #[error("{series} has {found} values, expected {expected}")]
    ArityMismatch {
        series: Series,
        expected: usize,
        found: usize,
    },

    /// A token is not a finite decimal number.
    #[error("{series} value {token:?} is not a number")]
    NotANumber { series: Series, token: String },

    /// A request file has content after the query point line.
    #[error("Unexpected content on line {0} of request file")]
    UnexpectedContent(usize),

    /// The request file could not be written.
    #[error("Failed to write request file {}: {source}", .path.display())]
    RequestWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The solver could not be launched or exited with a failure status.
    #[error("Solver {} failed: {cause}", .executable.display())]
    SolverExecutionFailed {
        executable: PathBuf,
        #[source]
        cause: ExecutionFailure,
    },

    /// A response file left by an earlier run could not be removed.
    #[error("Failed to remove stale response file {}: {source}", .path.display())]
    ResponseClearFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The solver exited successfully but left no response file.
    #[error("Solver did not produce response file {}", .0.display())]
    ResponseFileMissing(PathBuf),

    /// The response file exists but could not be read.
    #[error("Failed to read response file {}: {source}", .path.display())]
    ResponseReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// OS-level cause of a failed solver run.
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    /// Spawning the process failed (missing executable, permission denied).
    #[error("could not launch: {0}")]
    Launch(#[source] io::Error),

    /// The process ran but did not exit with status zero.
    #[error("{0}")]
    Status(ExitStatus),
}

/// Serializable error category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidNodeCount,
    UnsupportedMode,
    ArityMismatch,
    NotANumber,
    UnexpectedContent,
    RequestWriteFailed,
    ResponseClearFailed,
    SolverExecutionFailed,
    ResponseFileMissing,
    ResponseReadFailed,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidNodeCount(_) => ErrorKind::InvalidNodeCount,
            Error::UnsupportedMode(_) => ErrorKind::UnsupportedMode,
            Error::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Error::NotANumber { .. } => ErrorKind::NotANumber,
            Error::UnexpectedContent(_) => ErrorKind::UnexpectedContent,
            Error::RequestWriteFailed { .. } => ErrorKind::RequestWriteFailed,
            Error::ResponseClearFailed { .. } => ErrorKind::ResponseClearFailed,
            Error::SolverExecutionFailed { .. } => ErrorKind::SolverExecutionFailed,
            Error::ResponseFileMissing(_) => ErrorKind::ResponseFileMissing,
            Error::ResponseReadFailed { .. } => ErrorKind::ResponseReadFailed,
        }
    }

    /// Stage of the invocation the error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            Error::InvalidNodeCount(_)
            | Error::UnsupportedMode(_)
            | Error::ArityMismatch { .. }
            | Error::NotANumber { .. }
            | Error::UnexpectedContent(_) => Stage::Validating,
            Error::RequestWriteFailed { .. } => Stage::Encoding,
            Error::ResponseClearFailed { .. } | Error::SolverExecutionFailed { .. } => {
                Stage::Invoking
            }
            Error::ResponseFileMissing(_) | Error::ResponseReadFailed { .. } => Stage::Decoding,
        }
    }

    /// Check if the user can fix this by editing the input fields.
    pub fn is_input_error(&self) -> bool {
        self.stage() == Stage::Validating
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

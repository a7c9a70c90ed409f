//! Command-line presentation layer.
//!
//! `App` owns a [`SolverService`] and turns each outcome into something to
//! print. It holds no state between submissions: every call builds a fresh
//! [`Response`] from the raw input strings.

use serde::Serialize;

use spline_front::error::{Error, ErrorKind};
use spline_front::models::{RawRequest, SolverResult, Stage};
use spline_front::solver::SolverService;

/// Exit code for input the user has to correct.
pub const EXIT_INPUT_ERROR: i32 = 2;

/// Exit code for solver and file failures.
pub const EXIT_SOLVER_ERROR: i32 = 1;

/// Printable outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success { result: String },
    Failure { error: ErrorReport },
}

/// Error details as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub stage: Stage,
    pub message: String,
}

impl From<&Error> for ErrorReport {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            stage: err.stage(),
            message: err.to_string(),
        }
    }
}

impl Response {
    pub fn from_outcome(outcome: &Result<SolverResult, Error>) -> Self {
        match outcome {
            Ok(result) => Response::Success {
                result: result.text().to_string(),
            },
            Err(e) => Response::Failure {
                error: ErrorReport::from(e),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// Process exit code for this response.
    pub fn exit_code(&self) -> i32 {
        match self {
            Response::Success { .. } => 0,
            Response::Failure { error } if error.stage == Stage::Validating => EXIT_INPUT_ERROR,
            Response::Failure { .. } => EXIT_SOLVER_ERROR,
        }
    }

    /// Plain text: the solver output verbatim, or a one-line error.
    pub fn render_text(&self) -> String {
        match self {
            Response::Success { result } => result.clone(),
            Response::Failure { error } => format!("Error: {}", error.message),
        }
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Front-end over a solver service.
pub struct App<S: SolverService> {
    service: S,
}

impl<S: SolverService> App<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Run one computation and describe the outcome.
    pub fn submit(&self, request: &RawRequest) -> Response {
        tracing::info!(
            mode = %request.mode.trim(),
            nodes = %request.node_count.trim(),
            "Submitting request"
        );
        let outcome = self.service.compute(request);
        let response = Response::from_outcome(&outcome);
        if let Response::Failure { error } = &response {
            tracing::info!("Request failed at {} stage: {}", error.stage, error.message);
        }
        response
    }
}

//! Data models for the solver protocol.
//!
//! These are the immutable value objects passed across the boundary between
//! a front-end and the protocol layer: the raw request strings the user typed,
//! the validated request that gets written to disk, and the text the solver
//! wrote back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Arithmetic regime the external solver runs in.
///
/// The numeric value is what goes on the first line of the request file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Ordinary floating point values.
    Point,
    /// Every decimal value becomes a single interval.
    Interval,
    /// Values are given as explicit interval bounds.
    DoubleInterval,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Point, Mode::Interval, Mode::DoubleInterval];

    /// Parse the numeric mode code (`1`, `2` or `3`).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Mode::Point),
            2 => Some(Mode::Interval),
            3 => Some(Mode::DoubleInterval),
            _ => None,
        }
    }

    /// Numeric code written to the request file.
    pub fn code(&self) -> u8 {
        match self {
            Mode::Point => 1,
            Mode::Interval => 2,
            Mode::DoubleInterval => 3,
        }
    }

    /// Tokens required per node in each of the x and y series.
    pub fn arity_factor(&self) -> usize {
        match self {
            Mode::Point => 1,
            Mode::Interval => 2,
            Mode::DoubleInterval => 4,
        }
    }

    /// Tokens required in the query point.
    pub fn query_arity(&self) -> usize {
        match self {
            Mode::Point => 1,
            Mode::Interval => 2,
            Mode::DoubleInterval => 4,
        }
    }

    /// Get a short display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Point => "point",
            Mode::Interval => "interval",
            Mode::DoubleInterval => "double interval",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One of the three numeric inputs of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    X,
    Y,
    Query,
}

impl Series {
    pub fn as_str(&self) -> &'static str {
        match self {
            Series::X => "x",
            Series::Y => "y",
            Series::Query => "query point",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated request strings, exactly as a front-end collected them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRequest {
    pub mode: String,
    pub node_count: String,
    pub x: String,
    pub y: String,
    pub query: String,
}

impl RawRequest {
    /// Create a raw request from the five input fields.
    pub fn new(
        mode: impl Into<String>,
        node_count: impl Into<String>,
        x: impl Into<String>,
        y: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            node_count: node_count.into(),
            x: x.into(),
            y: y.into(),
            query: query.into(),
        }
    }
}

/// A validated interpolation request.
///
/// Only [`RawRequest::validate`] builds these, so the arity and finiteness
/// invariants always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolationRequest {
    pub(crate) mode: Mode,
    pub(crate) node_count: usize,
    pub(crate) x_series: Vec<f64>,
    pub(crate) y_series: Vec<f64>,
    pub(crate) query_point: Vec<f64>,
}

impl InterpolationRequest {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn x_series(&self) -> &[f64] {
        &self.x_series
    }

    pub fn y_series(&self) -> &[f64] {
        &self.y_series
    }

    /// Evaluation point. Treated as opaque ordered parameters; the pairing
    /// of bounds in the interval modes is up to the solver.
    pub fn query_point(&self) -> &[f64] {
        &self.query_point
    }
}

/// Text the solver wrote to its response file, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverResult {
    text: String,
}

impl SolverResult {
    /// Build a result from raw response file contents.
    pub fn from_response(raw: &str) -> Self {
        Self {
            text: raw.trim().to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Stage of a single compute invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Validating,
    Encoding,
    Invoking,
    Decoding,
    Succeeded,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Encoding => "encoding",
            Stage::Invoking => "invoking",
            Stage::Decoding => "decoding",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        }
    }

    /// Check if the invocation has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_codes_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(Mode::from_code(0), None);
        assert_eq!(Mode::from_code(4), None);
    }

    #[test]
    fn test_mode_arity_table() {
        assert_eq!(Mode::Point.arity_factor(), 1);
        assert_eq!(Mode::Interval.arity_factor(), 2);
        assert_eq!(Mode::DoubleInterval.arity_factor(), 4);
        assert_eq!(Mode::Point.query_arity(), 1);
        assert_eq!(Mode::Interval.query_arity(), 2);
        assert_eq!(Mode::DoubleInterval.query_arity(), 4);
    }

    #[test]
    fn test_solver_result_is_trimmed() {
        let result = SolverResult::from_response("\n  S(2.5) = 4.125\nStatus: 0\n\n");
        assert_eq!(result.text(), "S(2.5) = 4.125\nStatus: 0");
    }

    #[test]
    fn test_stage_terminal() {
        assert!(Stage::Succeeded.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::Invoking.is_terminal());
    }

    #[test]
    fn test_mode_serde_snake_case() {
        let json = serde_json::to_string(&Mode::DoubleInterval).unwrap();
        assert_eq!(json, "\"double_interval\"");
    }
}

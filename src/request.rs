//! Request validation.
//!
//! Turns the five raw input strings into an [`InterpolationRequest`]. Checks
//! run in a fixed order and the first failure wins:
//!
//! 1. node count is a positive integer
//! 2. mode is one of 1, 2, 3
//! 3. x, y and query token counts match the mode (counted, not parsed)
//! 4. every token is a finite decimal number
//!
//! Arity is always checked before any token is parsed, so a short series of
//! garbage reports `ArityMismatch`, not `NotANumber`.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{InterpolationRequest, Mode, RawRequest, Series};

impl RawRequest {
    /// Validate the raw strings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNodeCount`, `UnsupportedMode`, `ArityMismatch` or
    /// `NotANumber`, in that order of precedence.
    pub fn validate(&self) -> Result<InterpolationRequest> {
        let node_count = parse_node_count(&self.node_count)?;

        let x_tokens: Vec<&str> = self.x.split_whitespace().collect();
        let y_tokens: Vec<&str> = self.y.split_whitespace().collect();
        let query_tokens: Vec<&str> = self.query.split_whitespace().collect();

        let mode = parse_mode(&self.mode)?;
        let series_len = node_count
            .checked_mul(mode.arity_factor())
            .ok_or_else(|| Error::InvalidNodeCount(self.node_count.clone()))?;

        check_arity(Series::X, &x_tokens, series_len)?;
        check_arity(Series::Y, &y_tokens, series_len)?;
        check_arity(Series::Query, &query_tokens, mode.query_arity())?;

        let request = InterpolationRequest {
            mode,
            node_count,
            x_series: parse_series(Series::X, &x_tokens)?,
            y_series: parse_series(Series::Y, &y_tokens)?,
            query_point: parse_series(Series::Query, &query_tokens)?,
        };

        debug!(
            mode = mode.code(),
            node_count,
            series_len,
            "Request validated"
        );
        Ok(request)
    }
}

fn parse_node_count(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidNodeCount(raw.to_string())),
    }
}

fn parse_mode(raw: &str) -> Result<Mode> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(Mode::from_code)
        .ok_or_else(|| Error::UnsupportedMode(raw.to_string()))
}

fn check_arity(series: Series, tokens: &[&str], expected: usize) -> Result<()> {
    if tokens.len() != expected {
        return Err(Error::ArityMismatch {
            series,
            expected,
            found: tokens.len(),
        });
    }
    Ok(())
}

/// Parse a single token as a finite decimal number. `inf`, `nan` and values
/// that overflow to infinity are rejected.
fn parse_number(series: Series, token: &str) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::NotANumber {
            series,
            token: token.to_string(),
        }),
    }
}

fn parse_series(series: Series, tokens: &[&str]) -> Result<Vec<f64>> {
    tokens
        .iter()
        .map(|token| parse_number(series, token))
        .collect()
}

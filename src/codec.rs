//! Line-oriented request file format.
//!
//! # Wire Format
//!
//! ```text
//! <mode>\n
//! <node_count>\n
//! <x1> <x2> ... <xk>\n
//! <y1> <y2> ... <yk>\n
//! <q1> [<q2> [<q3> <q4>]]\n
//! ```
//!
//! Numbers are written with `f64`'s `Display`, the shortest decimal form that
//! parses back to the same value (`1` stays `1`, `2.5` stays `2.5`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{InterpolationRequest, RawRequest};

/// Serialize a validated request into the request file text.
pub fn encode_request(request: &InterpolationRequest) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n",
        request.mode(),
        request.node_count(),
        join_values(request.x_series()),
        join_values(request.y_series()),
        join_values(request.query_point()),
    )
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write the request file.
///
/// The text goes to a sibling temporary file first and is renamed into
/// place, so readers never see a half-written request.
///
/// # Errors
///
/// Returns `RequestWriteFailed` if the temporary file cannot be written or
/// renamed. The temporary file is removed on failure.
pub fn write_request_file(path: &Path, request: &InterpolationRequest) -> Result<()> {
    let body = encode_request(request);
    let tmp_path = temporary_path(path);

    let written = fs::write(&tmp_path, body.as_bytes()).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::RequestWriteFailed {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!(path = %path.display(), bytes = body.len(), "Request file written");
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Parse request file text back into a validated request.
///
/// The five lines are run through the same validation as user input, so a
/// hand-edited file is held to the same rules. Missing trailing lines are
/// treated as empty; blank lines after the query point are allowed.
///
/// # Errors
///
/// Returns the validation error for the first offending line, or
/// `UnexpectedContent` if a non-blank line follows the query point.
pub fn decode_request(text: &str) -> Result<InterpolationRequest> {
    let mut lines = text.lines();
    let mut next = || lines.next().unwrap_or_default().to_string();

    let raw = RawRequest {
        mode: next(),
        node_count: next(),
        x: next(),
        y: next(),
        query: next(),
    };
    let request = raw.validate()?;

    if let Some(offset) = lines.position(|line| !line.trim().is_empty()) {
        return Err(Error::UnexpectedContent(REQUEST_LINES + offset + 1));
    }
    Ok(request)
}

const REQUEST_LINES: usize = 5;

/// Read and decode a request file from disk.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or the validation error
/// if its contents are malformed.
pub fn read_request_file(path: &Path) -> anyhow::Result<InterpolationRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    Ok(decode_request(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Mode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_point_mode() {
        let request = RawRequest::new("1", "3", "1 2 3", "2 3 5", "2.5")
            .validate()
            .unwrap();
        assert_eq!(encode_request(&request), "1\n3\n1 2 3\n2 3 5\n2.5\n");
    }

    #[test]
    fn test_encode_double_interval_mode() {
        let request = RawRequest::new(
            "3",
            "1",
            "0.1 0.2 -1.5 1e-3",
            "4 4.25 5 5.5",
            "0.5 0.6 0.7 0.8",
        )
        .validate()
        .unwrap();
        assert_eq!(
            encode_request(&request),
            "3\n1\n0.1 0.2 -1.5 0.001\n4 4.25 5 5.5\n0.5 0.6 0.7 0.8\n"
        );
    }

    #[test]
    fn test_decode_reproduces_request() {
        let request = RawRequest::new("2", "2", "0.1 0.3 1 1.25", "-2 -1.5 7 8", "0.2 0.25")
            .validate()
            .unwrap();
        let decoded = decode_request(&encode_request(&request)).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(decoded.mode(), Mode::Interval);
    }

    #[test]
    fn test_decode_truncated_file() {
        let err = decode_request("1\n3\n1 2 3\n2 3 5\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);

        let err = decode_request("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNodeCount);
    }

    #[test]
    fn test_decode_rejects_trailing_content() {
        let err = decode_request("1\n3\n1 2 3\n2 3 5\n2.5\n7\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedContent);
        assert_eq!(err.to_string(), "Unexpected content on line 6 of request file");

        let err = decode_request("1\n3\n1 2 3\n2 3 5\n2.5\n\n  \nextra\n").unwrap_err();
        assert!(matches!(err, Error::UnexpectedContent(8)), "{err}");
    }

    #[test]
    fn test_decode_allows_trailing_blank_lines() {
        let request = decode_request("1\n3\n1 2 3\n2 3 5\n2.5\n\n \n").unwrap();
        assert_eq!(request.query_point(), &[2.5]);
    }

    #[test]
    fn test_decode_accepts_crlf() {
        let request = decode_request("1\r\n2\r\n1 2\r\n3 4\r\n1.5\r\n").unwrap();
        assert_eq!(request.x_series(), &[1.0, 2.0]);
        assert_eq!(request.query_point(), &[1.5]);
    }

    #[test]
    fn test_write_request_file_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "stale contents that are much longer than the request\n").unwrap();

        let request = RawRequest::new("1", "2", "1 2", "3 4", "1.5")
            .validate()
            .unwrap();
        write_request_file(&path, &request).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n1 2\n3 4\n1.5\n");
        assert!(!dir.path().join("input.txt.tmp").exists());
    }

    #[test]
    fn test_write_request_file_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("input.txt");
        let request = RawRequest::new("1", "1", "1", "1", "1").validate().unwrap();

        let err = write_request_file(&path, &request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestWriteFailed);
        assert!(!path.exists());
    }

    #[test]
    fn test_read_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "1\n3\n1 2 3\n2 3 5\n2.5\n").unwrap();

        let request = read_request_file(&path).unwrap();
        assert_eq!(request.node_count(), 3);

        let missing = read_request_file(&dir.path().join("nope.txt"));
        assert!(missing.is_err());
    }
}

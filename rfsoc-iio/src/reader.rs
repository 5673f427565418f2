//! Reading single numeric values from sysfs attribute files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::trace;

use crate::error::ReadError;

/// Read the first line of `path` that parses as a float.
///
/// Trailing lines are ignored once a value is found. The file is re-read on
/// every call.
pub fn read_value(path: impl AsRef<Path>) -> Result<f64, ReadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ReadError::Missing {
        path: path.to_path_buf(),
        source,
    })?;

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .find_map(|line| line.trim().parse::<f64>().ok())
        .ok_or_else(|| ReadError::NoValue {
            path: path.to_path_buf(),
        })
}

/// Read a value, substituting `0.0` when the file is missing or unparsable.
pub fn read_value_or_default(path: impl AsRef<Path>) -> f64 {
    value_or_default(read_value(path))
}

/// Fail-open policy for a single read: errors become `0.0`.
pub fn value_or_default(result: Result<f64, ReadError>) -> f64 {
    result.unwrap_or_else(|e| {
        trace!(error = %e, "Using 0.0 for unreadable sensor file");
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_first_line_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in_temp0_raw");
        fs::write(&path, "3.5\n7.2").unwrap();

        assert_eq!(read_value(&path).unwrap(), 3.5);
    }

    #[test]
    fn test_read_skips_unparsable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in_temp0_scale");
        fs::write(&path, "n/a\n  -12.25  \n4").unwrap();

        assert_eq!(read_value(&path).unwrap(), -12.25);
    }

    #[test]
    fn test_read_integer_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in_voltage0_raw");
        fs::write(&path, "2048\n").unwrap();

        assert_eq!(read_value(&path).unwrap(), 2048.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist");

        assert!(matches!(read_value(&path), Err(ReadError::Missing { .. })));
        assert_eq!(read_value_or_default(&path), 0.0);
    }

    #[test]
    fn test_no_numeric_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in_temp0_offset");
        fs::write(&path, "hello\nworld\n").unwrap();

        assert!(matches!(read_value(&path), Err(ReadError::NoValue { .. })));
        assert_eq!(read_value_or_default(&path), 0.0);
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, "").unwrap();

        assert_eq!(read_value_or_default(&path), 0.0);
    }

    #[test]
    fn test_value_or_default() {
        let missing = ReadError::NoValue {
            path: "in_temp0_raw".into(),
        };

        assert_eq!(value_or_default(Ok(-1.5)), -1.5);
        assert_eq!(value_or_default(Err(missing)), 0.0);
    }

    #[test]
    fn test_parsed_zero_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero");
        fs::write(&path, "0\n").unwrap();

        assert_eq!(read_value(&path).unwrap(), 0.0);
    }
}

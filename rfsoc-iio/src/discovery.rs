//! Discovery of calibrated sensors in an IIO device directory.
//!
//! A sensor is any directory entry whose name contains `raw`, e.g.
//! `in_temp0_raw`. Splitting on `_`, the first and last tokens are dropped to
//! form the sensor name (`temp0`) and the last token is dropped to form the
//! stub shared with the `_scale` and `_offset` attributes (`in_temp0`).

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Marker identifying the raw attribute of a channel.
const RAW_MARKER: &str = "raw";

/// A discovered sensor channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorIdentity {
    /// Sensor name used to build the metric name, e.g. `temp0`.
    pub name: String,
    /// Filename prefix of the raw/scale/offset triplet, e.g. `in_temp0`.
    pub stub: String,
}

impl SensorIdentity {
    /// Derive the identity from a directory entry name.
    ///
    /// Returns `None` for names that do not contain `raw`, and for names with
    /// fewer than three `_` tokens, which would yield an empty sensor name.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if !file_name.contains(RAW_MARKER) {
            return None;
        }

        let tokens: Vec<&str> = file_name.split('_').collect();
        if tokens.len() < 3 {
            return None;
        }

        let last = tokens.len() - 1;
        Some(Self {
            name: tokens[1..last].join("_"),
            stub: tokens[..last].join("_"),
        })
    }
}

/// Scan `dir` once and return every sensor found, sorted by stub.
///
/// Names appearing twice keep their first occurrence.
pub fn discover_sensors(dir: impl AsRef<Path>) -> Result<Vec<SensorIdentity>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| Error::Discovery {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut file_names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.contains(RAW_MARKER))
        .collect();
    file_names.sort();

    let mut seen = HashSet::new();
    let mut sensors = Vec::with_capacity(file_names.len());

    for file_name in file_names {
        let Some(sensor) = SensorIdentity::from_file_name(&file_name) else {
            warn!(file = %file_name, "Skipping sensor file with no derivable name");
            continue;
        };

        if !seen.insert(sensor.name.clone()) {
            warn!(
                file = %file_name,
                sensor = %sensor.name,
                "Duplicate sensor name, keeping first"
            );
            continue;
        }

        debug!(sensor = %sensor.name, stub = %sensor.stub, "Discovered sensor");
        sensors.push(sensor);
    }

    Ok(sensors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "0\n").unwrap();
    }

    #[test]
    fn test_identity_from_file_name() {
        let sensor = SensorIdentity::from_file_name("in_temp0_raw").unwrap();
        assert_eq!(sensor.name, "temp0");
        assert_eq!(sensor.stub, "in_temp0");
    }

    #[test]
    fn test_identity_multi_token_name() {
        let sensor = SensorIdentity::from_file_name("in_voltage0_vccint_raw").unwrap();
        assert_eq!(sensor.name, "voltage0_vccint");
        assert_eq!(sensor.stub, "in_voltage0_vccint");
    }

    #[test]
    fn test_identity_requires_raw() {
        assert!(SensorIdentity::from_file_name("something_else").is_none());
        assert!(SensorIdentity::from_file_name("in_temp0_scale").is_none());
    }

    #[test]
    fn test_identity_degenerate_names() {
        assert!(SensorIdentity::from_file_name("raw").is_none());
        assert!(SensorIdentity::from_file_name("x_raw").is_none());
    }

    #[test]
    fn test_discover_triplet() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "in_temp0_raw");
        touch(dir.path(), "in_temp0_scale");
        touch(dir.path(), "in_temp0_offset");
        touch(dir.path(), "something_else");
        touch(dir.path(), "name");

        let sensors = discover_sensors(dir.path()).unwrap();
        assert_eq!(
            sensors,
            vec![SensorIdentity {
                name: "temp0".to_string(),
                stub: "in_temp0".to_string(),
            }]
        );
    }

    #[test]
    fn test_discover_sorted_and_skips_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "in_voltage1_raw");
        touch(dir.path(), "in_temp0_raw");
        touch(dir.path(), "in_voltage0_raw");
        touch(dir.path(), "x_raw");

        let names: Vec<String> = discover_sensors(dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["temp0", "voltage0", "voltage1"]);
    }

    #[test]
    fn test_discover_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "in_temp0_raw");
        touch(dir.path(), "out_temp0_raw");

        let sensors = discover_sensors(dir.path()).unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].stub, "in_temp0");
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("iio:device9");

        let err = discover_sensors(&missing).unwrap_err();
        assert!(matches!(err, Error::Discovery { .. }));
        assert!(err.to_string().contains("iio:device9"));
    }
}

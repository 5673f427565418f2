//! Linear calibration of IIO channel readings.
//!
//! Each channel exposes three attributes sharing a stub:
//! `<stub>_raw`, `<stub>_scale` and `<stub>_offset`. The calibrated value is
//! `scale * (raw + offset) / 1000`, converting milli-units to base units.

use std::path::{Path, PathBuf};

use crate::reader::{read_value, value_or_default};

/// Fixed unit-scaling divisor applied after the linear transform.
pub const UNIT_DIVISOR: f64 = 1000.0;

/// The three raw terms read for one sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    pub raw: f64,
    pub scale: f64,
    pub offset: f64,
}

/// Result of reading one sensor, with the number of terms that fell back to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReading {
    pub calibration: Calibration,
    pub failed_terms: u32,
}

impl SensorReading {
    pub fn value(&self) -> f64 {
        self.calibration.value()
    }
}

impl Calibration {
    pub fn new(raw: f64, scale: f64, offset: f64) -> Self {
        Self { raw, scale, offset }
    }

    /// Apply the calibration formula.
    pub fn value(&self) -> f64 {
        self.scale * (self.raw + self.offset) / UNIT_DIVISOR
    }

    /// Read all three terms for `stub` inside `dir`.
    ///
    /// Unreadable terms default to `0.0` independently; the returned reading
    /// counts how many did.
    pub fn read(dir: &Path, stub: &str) -> SensorReading {
        let mut failed_terms = 0;
        let mut term = |suffix: &str| {
            let result = read_value(term_path(dir, stub, suffix));
            if result.is_err() {
                failed_terms += 1;
            }
            value_or_default(result)
        };

        let raw = term("raw");
        let scale = term("scale");
        let offset = term("offset");

        SensorReading {
            calibration: Calibration::new(raw, scale, offset),
            failed_terms,
        }
    }
}

/// Read and calibrate the sensor identified by `stub` inside `dir`.
pub fn calibrated_value(dir: &Path, stub: &str) -> f64 {
    Calibration::read(dir, stub).value()
}

fn term_path(dir: &Path, stub: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{}_{}", stub, suffix))
}

//! Sensor collector that owns the Prometheus registry and its gauges.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use rfsoc_iio::{Calibration, SensorIdentity, discover_sensors};
use tracing::{debug, trace, warn};

use crate::mapping::{build_metric_name, sensor_help};

/// A discovered sensor bound to its registered gauge.
#[derive(Debug, Clone)]
pub struct GaugeBinding {
    /// The sensor this gauge reports.
    pub sensor: SensorIdentity,
    /// The full Prometheus metric name.
    pub metric_name: String,
    gauge: Gauge<f64, AtomicU64>,
}

impl GaugeBinding {
    /// Current value held by the gauge.
    pub fn value(&self) -> f64 {
        self.gauge.get()
    }
}

/// Collector statistics.
#[derive(Debug, Clone, Default)]
pub struct CollectorStats {
    /// Number of refresh passes performed.
    pub scrapes: u64,
    /// Sensor files that were missing or unparsable during refreshes.
    pub read_errors: u64,
    /// Number of sensors bound to gauges.
    pub sensors: usize,
}

/// Holds the gauge bindings for every discovered sensor.
///
/// Bindings are fixed at construction. Gauge values are atomics, so
/// concurrent refreshes need no further locking.
pub struct SensorCollector {
    iio_dir: PathBuf,
    bindings: Vec<GaugeBinding>,
    registry: Registry,
    scrapes: Counter,
    read_errors: Counter,
}

impl SensorCollector {
    /// Register one gauge per sensor under `{prefix}_{sensor}`.
    ///
    /// A sensor whose metric name is already taken, by another sensor or by
    /// one of the exporter's own metrics, is skipped.
    pub fn new(
        iio_dir: impl Into<PathBuf>,
        prefix: &str,
        sensors: impl IntoIterator<Item = SensorIdentity>,
    ) -> Self {
        let mut registry = Registry::default();

        let scrapes_name = build_metric_name(prefix, "exporter_scrapes");
        let read_errors_name = build_metric_name(prefix, "exporter_read_errors");
        let sensors_name = build_metric_name(prefix, "exporter_sensors");

        // Counters are exposed with a `_total` suffix, so both spellings are taken
        let mut taken: HashSet<String> = [
            format!("{}_total", scrapes_name),
            format!("{}_total", read_errors_name),
            scrapes_name.clone(),
            read_errors_name.clone(),
            sensors_name.clone(),
        ]
        .into_iter()
        .collect();

        let mut bindings = Vec::new();
        for sensor in sensors {
            let metric_name = build_metric_name(prefix, &sensor.name);
            if !taken.insert(metric_name.clone()) {
                warn!(
                    sensor = %sensor.name,
                    metric = %metric_name,
                    "Metric name already registered, skipping sensor"
                );
                continue;
            }

            let gauge = Gauge::<f64, AtomicU64>::default();
            registry.register(metric_name.clone(), sensor_help(&sensor.name), gauge.clone());

            debug!(sensor = %sensor.name, metric = %metric_name, "Adding gauge");

            bindings.push(GaugeBinding {
                sensor,
                metric_name,
                gauge,
            });
        }

        let scrapes = Counter::default();
        registry.register(
            scrapes_name,
            "Number of sensor refreshes triggered by scrapes",
            scrapes.clone(),
        );

        let read_errors = Counter::default();
        registry.register(
            read_errors_name,
            "Sensor files missing or unparsable during refreshes",
            read_errors.clone(),
        );

        let sensor_count = Gauge::<i64>::default();
        sensor_count.set(bindings.len() as i64);
        registry.register(
            sensors_name,
            "Number of sensors bound to gauges",
            sensor_count,
        );

        Self {
            iio_dir: iio_dir.into(),
            bindings,
            registry,
            scrapes,
            read_errors,
        }
    }

    /// Discover the sensors in `iio_dir` and register their gauges.
    ///
    /// A directory that cannot be listed is logged and yields a collector
    /// with no sensor gauges, so the exporter keeps serving its own metrics.
    pub fn discover(iio_dir: impl Into<PathBuf>, prefix: &str) -> Self {
        let iio_dir = iio_dir.into();
        let sensors = discover_sensors(&iio_dir).unwrap_or_else(|e| {
            warn!(error = %e, "Sensor discovery failed, serving no sensor gauges");
            Vec::new()
        });

        Self::new(iio_dir, prefix, sensors)
    }

    /// Directory the sensor files are read from.
    pub fn iio_dir(&self) -> &Path {
        &self.iio_dir
    }

    /// The gauge bindings, in discovery order.
    pub fn bindings(&self) -> &[GaugeBinding] {
        &self.bindings
    }

    /// Re-read every sensor from disk and update its gauge.
    ///
    /// Blocks on filesystem I/O; call it off the async executor.
    pub fn refresh(&self) {
        debug!(sensors = self.bindings.len(), "Updating gauges");

        for binding in &self.bindings {
            let reading = Calibration::read(&self.iio_dir, &binding.sensor.stub);
            if reading.failed_terms > 0 {
                self.read_errors.inc_by(u64::from(reading.failed_terms));
            }

            let value = reading.value();
            trace!(sensor = %binding.sensor.name, value, "Sensor read");
            binding.gauge.set(value);
        }

        self.scrapes.inc();
    }

    /// Render the registry in the text exposition format.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut output = String::with_capacity(self.bindings.len() * 128 + 512);
        encode(&mut output, &self.registry)?;
        Ok(output)
    }

    /// Get collector statistics.
    pub fn stats(&self) -> CollectorStats {
        CollectorStats {
            scrapes: self.scrapes.get(),
            read_errors: self.read_errors.get(),
            sensors: self.bindings.len(),
        }
    }
}

/// Create a shareable collector handle.
pub type SharedCollector = Arc<SensorCollector>;

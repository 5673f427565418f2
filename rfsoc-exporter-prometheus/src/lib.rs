//! Prometheus metrics exporter for RFSoC IIO sensors.
//!
//! This crate discovers the calibrated channels of an IIO device once at
//! startup and exposes them via an HTTP `/metrics` endpoint. Every scrape
//! re-reads the sensor files, so the endpoint always reflects the latest
//! values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │   IIO sysfs     │────>│    Collector    │────>│   HTTP Server   │
//! │ (*_raw/scale/…) │     │    (gauges)     │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! rfsoc-exporter-prometheus --iioPrefix /sys/bus/iio/devices/iio:device0 --port 2112
//! ```

pub mod collector;
pub mod config;
pub mod http;
pub mod mapping;

pub use collector::{CollectorStats, GaugeBinding, SensorCollector, SharedCollector};
pub use config::ExporterConfig;
pub use http::HttpServer;

//! Mapping from IIO sensor names to Prometheus metric names.

/// Map a sensor name onto the Prometheus metric-name alphabet.
///
/// Prometheus metric names must match `[a-zA-Z_:][a-zA-Z0-9_:]*`. Each
/// invalid character becomes one `_` and a leading digit gets a `_` in front.
/// Valid names, including runs of underscores, pass through unchanged.
pub fn sanitize_metric_name(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }

    let mut result = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        result.push('_');
    }

    result.extend(name.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
            c
        } else {
            '_'
        }
    }));

    result
}

/// Build the full metric name for a sensor.
///
/// Format: `{prefix}_{sensor}`, or just the sanitized sensor name when the
/// prefix is empty.
pub fn build_metric_name(prefix: &str, sensor: &str) -> String {
    let sanitized = sanitize_metric_name(sensor);

    if prefix.is_empty() {
        sanitized
    } else {
        format!("{}_{}", prefix, sanitized)
    }
}

/// Help text registered with each sensor gauge.
pub fn sensor_help(sensor: &str) -> String {
    format!("RFSoC sensor reading for {}", sensor)
}

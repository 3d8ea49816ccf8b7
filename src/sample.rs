//! Metric sample types for API request observations.
//!
//! A [`RawSample`] is what arrives on the wire; a [`MetricSample`] has a
//! parsed timestamp and all optional fields resolved to their defaults.

use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use serde::Deserialize;

fn default_compute_density() -> f64 {
    1.0
}

/// One metric sample as received in the request payload.
///
/// Every field except `timestamp` has a defined default; unknown fields in
/// the payload are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub response_time_ms: Option<f64>,
    #[serde(default)]
    pub error: bool,
    #[serde(default = "default_compute_density")]
    pub compute_density: f64,
}

/// A validated sample with its timestamp parsed and defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub timestamp: NaiveDateTime,
    pub response_time_ms: Option<f64>,
    pub error: bool,
    pub compute_density: f64,
}

impl MetricSample {
    /// Validates a raw sample, parsing its ISO-8601 timestamp.
    ///
    /// Accepts `T` or space as the date/time separator and optional
    /// fractional seconds. Offset-bearing timestamps are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp is absent or unparsable. Callers
    /// are expected to drop such samples rather than abort the batch.
    pub fn from_raw(raw: &RawSample) -> Result<Self> {
        let Some(ts) = raw.timestamp.as_deref() else {
            bail!("sample has no timestamp");
        };

        let timestamp = ts
            .parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f"))?;

        Ok(Self {
            timestamp,
            response_time_ms: raw.response_time_ms,
            error: raw.error,
            compute_density: raw.compute_density,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw(timestamp: Option<&str>) -> RawSample {
        RawSample {
            timestamp: timestamp.map(str::to_string),
            response_time_ms: None,
            error: false,
            compute_density: 1.0,
        }
    }

    #[test]
    fn test_from_raw_t_separator() {
        let sample = MetricSample::from_raw(&raw(Some("2024-06-01T12:34:56"))).unwrap();
        assert_eq!(sample.timestamp.year(), 2024);
        assert_eq!(sample.timestamp.hour(), 12);
        assert_eq!(sample.timestamp.second(), 56);
    }

    #[test]
    fn test_from_raw_space_separator() {
        let sample = MetricSample::from_raw(&raw(Some("2024-06-01 12:34:56"))).unwrap();
        assert_eq!(sample.timestamp.minute(), 34);
    }

    #[test]
    fn test_from_raw_fractional_seconds() {
        let sample = MetricSample::from_raw(&raw(Some("2024-06-01T12:34:56.250"))).unwrap();
        assert_eq!(sample.timestamp.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_from_raw_missing_timestamp() {
        assert!(MetricSample::from_raw(&raw(None)).is_err());
    }

    #[test]
    fn test_from_raw_garbage_timestamp() {
        assert!(MetricSample::from_raw(&raw(Some("not-a-date"))).is_err());
    }

    #[test]
    fn test_from_raw_rejects_offset() {
        assert!(MetricSample::from_raw(&raw(Some("2024-06-01T12:34:56+02:00"))).is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let sample: RawSample =
            serde_json::from_str(r#"{"timestamp": "2024-06-01T12:00:00"}"#).unwrap();
        assert!(!sample.error);
        assert_eq!(sample.compute_density, 1.0);
        assert!(sample.response_time_ms.is_none());
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let sample: RawSample = serde_json::from_str(
            r#"{"timestamp": "2024-06-01T12:00:00", "endpoint": "/api/v1/users"}"#,
        )
        .unwrap();
        assert!(sample.timestamp.is_some());
    }
}

//! JSON parser for metric sample batches.

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::sample::RawSample;

/// The request payload: a batch of metric samples under a `metrics` key.
#[derive(Debug, Deserialize)]
pub struct MetricsBatch {
    pub metrics: Vec<RawSample>,
}

/// Decodes a JSON-encoded [`MetricsBatch`] from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON, if the `metrics` key
/// is missing or not a list, or if the list is empty. Per-sample timestamp
/// problems are not checked here; the scoring pipeline drops those samples
/// individually.
pub fn parse_batch(bytes: &[u8]) -> Result<Vec<RawSample>> {
    let batch: MetricsBatch = serde_json::from_slice(bytes)?;
    if batch.metrics.is_empty() {
        bail!("metrics must be a non-empty list");
    }
    Ok(batch.metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_batch() {
        let body =
            br#"{"metrics": [{"timestamp": "2024-06-01T12:00:00", "response_time_ms": 120}]}"#;
        let samples = parse_batch(body).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].response_time_ms, Some(120.0));
    }

    #[test]
    fn test_parse_missing_metrics_key() {
        assert!(parse_batch(br#"{"samples": []}"#).is_err());
    }

    #[test]
    fn test_parse_metrics_not_a_list() {
        assert!(parse_batch(br#"{"metrics": "lots"}"#).is_err());
    }

    #[test]
    fn test_parse_empty_metrics() {
        assert!(parse_batch(br#"{"metrics": []}"#).is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_batch(b"{not json").is_err());
    }
}

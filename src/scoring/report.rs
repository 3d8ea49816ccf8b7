//! End-to-end scoring: raw samples in, nested health report out.

use std::collections::HashMap;

use tracing::debug;

use crate::sample::{MetricSample, RawSample};
use crate::scoring::bucket::bucketize;
use crate::scoring::score::{ScoreRecord, compute_score};
use crate::scoring::windows::Window;

/// Nested scoring result: window name → bucket-key string → score record.
///
/// All seven window names are always present; a window maps to an empty
/// inner map when no sample survived timestamp validation.
pub type HealthReport = HashMap<&'static str, HashMap<String, ScoreRecord>>;

/// Scores a batch of raw samples across all seven window definitions.
///
/// Samples whose timestamp is missing or unparsable are dropped from every
/// window; this never fails the batch. The computation is pure and holds no
/// state across calls, so concurrent invocations are independent.
pub fn analyze(raw: &[RawSample]) -> HealthReport {
    let samples: Vec<MetricSample> = raw
        .iter()
        .filter_map(|r| match MetricSample::from_raw(r) {
            Ok(sample) => Some(sample),
            Err(e) => {
                debug!(error = %e, "Dropping sample");
                None
            }
        })
        .collect();

    let mut buckets = bucketize(&samples);

    let mut report = HealthReport::with_capacity(Window::ALL.len());
    for window in Window::ALL {
        let groups = buckets.remove(&window).unwrap_or_default();
        let scores = groups
            .into_iter()
            .map(|(key, bucket)| (key.to_string(), compute_score(&bucket)))
            .collect();
        report.insert(window.name(), scores);
    }

    report
}

//! Reduction of one bucket of samples to a health score.

use serde::Serialize;

use crate::sample::MetricSample;
use crate::scoring::utility::mean;

/// Health summary for one bucket of samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub score: i64,
    pub avg_response_time_ms: f64,
    pub throughput: usize,
    pub error_rate: f64,
    pub avg_compute_density: f64,
}

/// Reduces a non-empty bucket to a [`ScoreRecord`].
///
/// Starting from 100, the score loses up to 40 points for mean latency over
/// 2000 ms (1 point per 50 ms), up to 30 points proportional to the error
/// rate, up to 10 points for mean compute density under 0.5, and is adjusted
/// for volume (+5 over 1000 samples, −10 under 100). The result is rounded
/// half-to-even and clamped to [1, 100].
///
/// Samples without a `response_time_ms` are excluded from the latency mean
/// (which is 0 when no sample carries one) but count toward throughput and
/// error rate.
pub fn compute_score(samples: &[&MetricSample]) -> ScoreRecord {
    debug_assert!(!samples.is_empty(), "buckets are never empty");

    let throughput = samples.len();

    let response_times: Vec<f64> = samples.iter().filter_map(|s| s.response_time_ms).collect();
    let avg_resp = mean(&response_times);

    let error_count = samples.iter().filter(|s| s.error).count();
    let error_rate = error_count as f64 / throughput as f64;

    let densities: Vec<f64> = samples.iter().map(|s| s.compute_density).collect();
    let avg_cd = mean(&densities);

    let mut score = 100.0;

    if avg_resp > 2000.0 {
        score -= f64::min(40.0, (avg_resp - 2000.0) / 50.0);
    }

    score -= error_rate * 30.0;

    if avg_cd < 0.5 {
        score -= (0.5 - avg_cd) * 20.0;
    }

    if throughput > 1000 {
        score += 5.0;
    } else if throughput < 100 {
        score -= 10.0;
    }

    ScoreRecord {
        score: (score.round_ties_even() as i64).clamp(1, 100),
        avg_response_time_ms: avg_resp,
        throughput,
        error_rate,
        avg_compute_density: avg_cd,
    }
}

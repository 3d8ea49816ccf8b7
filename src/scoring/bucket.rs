//! Fan-out of validated samples into per-window buckets.

use std::collections::HashMap;

use crate::sample::MetricSample;
use crate::scoring::windows::{BucketKey, Window};

/// Samples grouped by bucket key, one map per window definition.
pub type WindowBuckets<'a> = HashMap<Window, HashMap<BucketKey, Vec<&'a MetricSample>>>;

/// Groups every sample under its derived key for each of the seven windows.
///
/// The windows are independent views of the same data: one sample lands in
/// exactly one bucket per window, so seven buckets in total. Buckets are
/// created on first use; empty buckets never exist.
pub fn bucketize(samples: &[MetricSample]) -> WindowBuckets<'_> {
    let mut buckets: WindowBuckets<'_> = HashMap::with_capacity(Window::ALL.len());

    for sample in samples {
        for window in Window::ALL {
            let key = window.bucket_key(sample.timestamp);
            buckets
                .entry(window)
                .or_default()
                .entry(key)
                .or_default()
                .push(sample);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: &str) -> MetricSample {
        MetricSample {
            timestamp: timestamp.parse().unwrap(),
            response_time_ms: Some(100.0),
            error: false,
            compute_density: 1.0,
        }
    }

    #[test]
    fn test_sample_lands_in_all_seven_windows() {
        let samples = vec![sample("2024-06-01T12:34:56")];
        let buckets = bucketize(&samples);

        assert_eq!(buckets.len(), 7);
        for window in Window::ALL {
            let groups = &buckets[&window];
            assert_eq!(groups.len(), 1);
            assert_eq!(groups.values().next().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_same_hour_samples_share_a_bucket() {
        let samples = vec![
            sample("2024-06-01T12:10:00"),
            sample("2024-06-01T12:50:00"),
            sample("2024-06-01T13:05:00"),
        ];
        let buckets = bucketize(&samples);

        let hours = &buckets[&Window::Hour];
        assert_eq!(hours.len(), 2);
        let noon = Window::Hour.bucket_key("2024-06-01T12:00:00".parse().unwrap());
        assert_eq!(hours[&noon].len(), 2);

        // all three fall on the same Saturday
        let weekdays = &buckets[&Window::DayOfWeek];
        assert_eq!(weekdays.len(), 1);
        assert_eq!(weekdays[&BucketKey::Ordinal(5)].len(), 3);
    }

    #[test]
    fn test_empty_input_produces_no_buckets() {
        let buckets = bucketize(&[]);
        assert!(buckets.is_empty());
    }
}

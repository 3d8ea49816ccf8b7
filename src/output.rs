//! Output formatting and persistence for health reports.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::scoring::report::HealthReport;
use crate::scoring::windows::Window;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a health report using Rust's debug pretty-print format.
pub fn print_pretty(report: &HealthReport) {
    debug!("{:#?}", report);
}

/// Serializes a health report as pretty-printed JSON.
pub fn to_json(report: &HealthReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One flattened CSV row: a single bucket's score under one window.
#[derive(Debug, Serialize)]
struct ScoreRow<'a> {
    window: &'a str,
    bucket: &'a str,
    score: i64,
    avg_response_time_ms: f64,
    throughput: usize,
    error_rate: f64,
    avg_compute_density: f64,
}

/// Appends a [`HealthReport`] as flattened rows to a CSV file.
///
/// Creates the file with headers if it does not already exist. Rows are
/// ordered by window, then by bucket key.
pub fn append_report(path: &str, report: &HealthReport) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for window in Window::ALL {
        let Some(groups) = report.get(window.name()) else {
            continue;
        };

        let mut keys: Vec<&String> = groups.keys().collect();
        keys.sort();

        for key in keys {
            let record = &groups[key];
            writer.serialize(ScoreRow {
                window: window.name(),
                bucket: key,
                score: record.score,
                avg_response_time_ms: record.avg_response_time_ms,
                throughput: record.throughput,
                error_rate: record.error_rate,
                avg_compute_density: record.avg_compute_density,
            })?;
        }
    }
    writer.flush()?;

    info!(path, "Report rows written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::RawSample;
    use crate::scoring::report::analyze;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn small_report() -> HealthReport {
        let samples = vec![RawSample {
            timestamp: Some("2024-06-01T12:34:56".to_string()),
            response_time_ms: Some(150.0),
            error: false,
            compute_density: 1.0,
        }];
        analyze(&samples)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&small_report());
    }

    #[test]
    fn test_to_json_nests_windows() {
        let json = to_json(&small_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["hour"]["2024-06-01 12:00:00"]["score"].is_i64());
    }

    #[test]
    fn test_append_report_creates_file() {
        let path = temp_path("api_health_rater_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_report(&path, &small_report()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        // header + one row per window
        assert_eq!(content.lines().count(), 8);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_report_writes_header_once() {
        let path = temp_path("api_health_rater_test_header.csv");
        let _ = fs::remove_file(&path);

        append_report(&path, &small_report()).unwrap();
        append_report(&path, &small_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("window,")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 15);

        fs::remove_file(&path).unwrap();
    }
}

//! Run reports — data model, collector, and file writers
//!
//! The report model is decoupled from the execution engine: reporters only
//! ever see [`ReportSummary`], so the engine's result types can evolve
//! without touching report output.

mod html;
mod json;
mod summary;

use std::path::PathBuf;

pub use html::write_html_report;
pub use json::write_json_report;
pub use summary::{Collector, ReportResult, ReportStatus, ReportSuite, ReportSummary};

use crate::config::ReporterConfig;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Run all enabled report writers. No-op when reporters are not configured.
///
/// Returns the paths written.
///
/// # Errors
///
/// Returns error if the output directory or a report file cannot be written.
pub fn run_reporters(
    summary: &ReportSummary,
    config: Option<&ReporterConfig>,
) -> Result<Vec<PathBuf>, ReportError> {
    let Some(config) = config else {
        return Ok(Vec::new());
    };

    let out_dir = config.out_dir();
    let mut written = Vec::new();

    if config.json {
        written.push(write_json_report(summary, &out_dir)?);
    }
    if config.html {
        written.push(write_html_report(summary, &out_dir)?);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> ReportSummary {
        let mut collector = Collector::new();
        collector.add_suite(
            "users",
            vec![
                ReportResult {
                    name: "GET /users".into(),
                    status: ReportStatus::Pass,
                    duration_ms: 12,
                    error: None,
                    response_body: None,
                },
                ReportResult {
                    name: "POST /users".into(),
                    status: ReportStatus::Fail,
                    duration_ms: 40,
                    error: Some("Expected 201 but got 500".into()),
                    response_body: Some(serde_json::json!({"detail": "boom"})),
                },
            ],
            52,
        );
        collector.summary()
    }

    #[test]
    fn no_reporter_config_is_noop() {
        let written = run_reporters(&sample_summary(), None).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn writes_enabled_reports() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReporterConfig {
            out_dir: Some(dir.path().join("out")),
            json: true,
            html: true,
        };

        let written = run_reporters(&sample_summary(), Some(&config)).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("out/report.json").exists());
        assert!(dir.path().join("out/report.html").exists());
    }

    #[test]
    fn disabled_writers_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReporterConfig {
            out_dir: Some(dir.path().to_path_buf()),
            json: false,
            html: false,
        };

        let written = run_reporters(&sample_summary(), Some(&config)).unwrap();
        assert!(written.is_empty());
        assert!(!dir.path().join("report.json").exists());
    }
}

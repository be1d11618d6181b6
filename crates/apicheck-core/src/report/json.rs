//! Machine-readable JSON report writer

use std::path::{Path, PathBuf};

use super::{ReportError, ReportSummary};

/// Write `report.json` under `out_dir`, creating the directory if needed.
///
/// Safe for CI artifact upload and programmatic consumption.
///
/// # Errors
///
/// Returns error if the directory or file cannot be written.
pub fn write_json_report(summary: &ReportSummary, out_dir: &Path) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| ReportError::Io(format!("create {}: {e}", out_dir.display())))?;

    let out_path = out_dir.join("report.json");
    let content = serde_json::to_string_pretty(summary)
        .map_err(|e| ReportError::Serialize(e.to_string()))?;
    std::fs::write(&out_path, content)
        .map_err(|e| ReportError::Io(format!("write {}: {e}", out_path.display())))?;

    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Collector, ReportResult, ReportStatus};

    #[test]
    fn writes_parseable_report() {
        let mut collector = Collector::new();
        collector.add_suite(
            "auth",
            vec![ReportResult {
                name: "POST /auth/login".into(),
                status: ReportStatus::Pass,
                duration_ms: 8,
                error: None,
                response_body: None,
            }],
            8,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = write_json_report(&collector.summary(), dir.path()).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let parsed: ReportSummary = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.total_tests, 1);
        assert_eq!(parsed.suites[0].name, "auth");
    }

    #[test]
    fn creates_nested_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        let path = write_json_report(&Collector::new().summary(), &nested).unwrap();
        assert!(path.exists());
    }
}

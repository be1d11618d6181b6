//! Report data model and result collector

use std::time::SystemTime;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of one test in report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pass,
    Fail,
}

/// One executed test, flattened for serialization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportResult {
    /// Test name
    pub name: String,
    /// Pass or fail
    pub status: ReportStatus,
    /// Elapsed wall-clock time in milliseconds
    pub duration_ms: u64,
    /// Failure message (fail only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Last response body observed by the test (fail only, when available)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<serde_json::Value>,
}

/// One suite of results.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportSuite {
    /// Suite name (exported suite name or module label)
    pub name: String,
    /// Per-test results in execution order
    pub results: Vec<ReportResult>,
    /// Passed count
    pub passed: usize,
    /// Failed count
    pub failed: usize,
    /// Total suite wall-clock time in milliseconds
    pub duration_ms: u64,
}

/// Aggregated report over every suite of one run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    /// ISO 8601 UTC timestamp of report creation
    pub timestamp: String,
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_tests: usize,
    /// Sum of suite durations in milliseconds
    pub total_duration_ms: u64,
    pub suites: Vec<ReportSuite>,
}

impl ReportSummary {
    /// JSON Schema for the report interchange format.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ReportSummary)
    }
}

/// Accumulates suite results across a run.
#[derive(Debug, Default)]
pub struct Collector {
    suites: Vec<ReportSuite>,
}

impl Collector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one finished suite.
    pub fn add_suite(&mut self, name: &str, results: Vec<ReportResult>, duration_ms: u64) {
        let passed = results
            .iter()
            .filter(|r| r.status == ReportStatus::Pass)
            .count();
        let failed = results.len() - passed;

        self.suites.push(ReportSuite {
            name: name.to_string(),
            results,
            passed,
            failed,
            duration_ms,
        });
    }

    /// Final aggregated summary.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let total_passed = self.suites.iter().map(|s| s.passed).sum();
        let total_failed = self.suites.iter().map(|s| s.failed).sum();
        let total_duration_ms = self.suites.iter().map(|s| s.duration_ms).sum();

        ReportSummary {
            timestamp: timestamp_iso(),
            total_passed,
            total_failed,
            total_tests: total_passed + total_failed,
            total_duration_ms,
            suites: self.suites.clone(),
        }
    }
}

/// `"2026-02-05T19:30:00Z"` — ISO 8601 for JSON.
fn timestamp_iso() -> String {
    let (y, mo, d, h, mi, s) = utc_now();
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z")
}

/// Current UTC date-time from epoch. No external crate needed.
fn utc_now() -> (i32, u32, u32, u32, u32, u32) {
    let epoch_secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let days = (epoch_secs / 86400) as i64;
    let tod = epoch_secs % 86400;
    let (y, m, d) = civil_from_days(days);
    (
        y,
        m,
        d,
        (tod / 3600) as u32,
        ((tod % 3600) / 60) as u32,
        (tod % 60) as u32,
    )
}

/// Howard Hinnant's `civil_from_days` — epoch days → (year, month, day).
///
/// Reference: <https://howardhinnant.github.io/date_algorithms.html#civil_from_days>
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = (z - era * 146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y as i32, m, d)
}

//! Self-contained HTML report writer
//!
//! One static page, no external assets, suitable for CI artifact browsing.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::{ReportError, ReportStatus, ReportSuite, ReportSummary};

/// Write `report.html` under `out_dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns error if the directory or file cannot be written.
pub fn write_html_report(summary: &ReportSummary, out_dir: &Path) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| ReportError::Io(format!("create {}: {e}", out_dir.display())))?;

    let out_path = out_dir.join("report.html");
    std::fs::write(&out_path, build_html(summary))
        .map_err(|e| ReportError::Io(format!("write {}: {e}", out_path.display())))?;

    Ok(out_path)
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}

fn render_suite(out: &mut String, suite: &ReportSuite) {
    let suite_class = if suite.failed > 0 { "fail" } else { "pass" };
    let _ = write!(
        out,
        r#"<section class="suite suite-{suite_class}">
<div class="suite-header"><span class="suite-name">{}</span>
<span class="suite-meta">{} passed · {} failed · {}</span></div>
<table><thead><tr><th>Status</th><th>Test</th><th>Duration</th></tr></thead><tbody>"#,
        esc(&suite.name),
        suite.passed,
        suite.failed,
        format_duration(suite.duration_ms),
    );

    for result in &suite.results {
        let (badge, class) = match result.status {
            ReportStatus::Pass => ("PASS", "pass"),
            ReportStatus::Fail => ("FAIL", "fail"),
        };
        let _ = write!(
            out,
            r#"<tr class="{class}"><td><span class="badge badge-{class}">{badge}</span></td><td>{}</td><td>{}</td></tr>"#,
            esc(&result.name),
            format_duration(result.duration_ms),
        );

        if let Some(error) = &result.error {
            let _ = write!(
                out,
                r#"<tr class="detail"><td colspan="3"><pre>{}</pre>"#,
                esc(error)
            );
            if let Some(body) = &result.response_body {
                let rendered =
                    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
                let _ = write!(out, "<pre class=\"response\">{}</pre>", esc(&rendered));
            }
            out.push_str("</td></tr>");
        }
    }

    out.push_str("</tbody></table></section>\n");
}

fn build_html(summary: &ReportSummary) -> String {
    let (status, status_class) = if summary.total_failed > 0 {
        ("FAILED", "fail")
    } else {
        ("PASSED", "pass")
    };

    let mut suites = String::new();
    for suite in &summary.suites {
        render_suite(&mut suites, suite);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>apicheck report</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", sans-serif; margin: 2rem auto; max-width: 60rem; color: #1c1c1c; }}
h1 {{ font-size: 1.3rem; }}
.status-pass {{ color: #1a7f37; }}
.status-fail {{ color: #cf222e; }}
.meta {{ color: #666; font-size: 0.85rem; }}
.suite {{ border: 1px solid #ddd; border-radius: 6px; margin: 1rem 0; }}
.suite-header {{ display: flex; justify-content: space-between; padding: 0.5rem 0.8rem; background: #f6f8fa; font-weight: 600; }}
.suite-meta {{ font-weight: 400; color: #666; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ text-align: left; padding: 0.4rem 0.8rem; border-top: 1px solid #eee; font-size: 0.9rem; }}
.badge {{ padding: 0.1rem 0.4rem; border-radius: 4px; font-size: 0.75rem; font-weight: 700; }}
.badge-pass {{ background: #dafbe1; color: #1a7f37; }}
.badge-fail {{ background: #ffebe9; color: #cf222e; }}
pre {{ background: #f6f8fa; padding: 0.5rem; border-radius: 4px; overflow-x: auto; font-size: 0.8rem; }}
pre.response {{ color: #57606a; }}
</style>
</head>
<body>
<h1>apicheck <span class="status-{status_class}">{status}</span></h1>
<p class="meta">{} · {} passed · {} failed · {} total · {}</p>
{suites}</body>
</html>
"#,
        esc(&summary.timestamp),
        summary.total_passed,
        summary.total_failed,
        summary.total_tests,
        format_duration(summary.total_duration_ms),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Collector, ReportResult};

    fn summary_with_failure() -> ReportSummary {
        let mut collector = Collector::new();
        collector.add_suite(
            "users & <admins>",
            vec![
                ReportResult {
                    name: "GET /users".into(),
                    status: ReportStatus::Pass,
                    duration_ms: 1500,
                    error: None,
                    response_body: None,
                },
                ReportResult {
                    name: "POST /users".into(),
                    status: ReportStatus::Fail,
                    duration_ms: 3,
                    error: Some("Expected 201 but got <500>".into()),
                    response_body: Some(serde_json::json!({"detail": "boom"})),
                },
            ],
            1503,
        );
        collector.summary()
    }

    #[test]
    fn renders_overall_status_and_counts() {
        let html = build_html(&summary_with_failure());
        assert!(html.contains("FAILED"));
        assert!(html.contains("1 passed"));
        assert!(html.contains("1 failed"));
    }

    #[test]
    fn escapes_markup_in_names_and_errors() {
        let html = build_html(&summary_with_failure());
        assert!(html.contains("users &amp; &lt;admins&gt;"));
        assert!(html.contains("got &lt;500&gt;"));
        assert!(!html.contains("<500>"));
    }

    #[test]
    fn includes_response_body_on_failure() {
        let html = build_html(&summary_with_failure());
        assert!(html.contains("boom"));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(999), "999ms");
        assert_eq!(format_duration(1500), "1.50s");
    }

    #[test]
    fn all_pass_renders_passed() {
        let mut collector = Collector::new();
        collector.add_suite(
            "ok",
            vec![ReportResult {
                name: "t".into(),
                status: ReportStatus::Pass,
                duration_ms: 1,
                error: None,
                response_body: None,
            }],
            1,
        );
        let html = build_html(&collector.summary());
        assert!(html.contains("PASSED"));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_html_report(&summary_with_failure(), dir.path()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
    }
}

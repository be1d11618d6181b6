//! Console output for test runs

use apicheck_core::TestError;

use crate::http::{HttpResponse, ResponseBody};

const BODY_PREVIEW_CHARS: usize = 400;

pub(crate) fn suite_header(name: &str) {
    eprintln!();
    eprintln!("> {name}");
}

pub(crate) fn test_pass(name: &str, duration_ms: u64) {
    eprintln!("  ok   {name} ({})", format_duration(duration_ms));
}

pub(crate) fn test_fail(
    name: &str,
    duration_ms: u64,
    error: &TestError,
    response: Option<&HttpResponse>,
) {
    eprintln!("  FAIL {name} ({})", format_duration(duration_ms));

    // Assertion failures render as a diff; everything else as its message.
    if let Some(assertion) = error.assertion() {
        eprintln!("       expected: {}", assertion.expected);
        eprintln!("       received: {}", assertion.actual);
    } else {
        for line in error.to_string().lines() {
            eprintln!("       {line}");
        }
    }

    if let Some(response) = response {
        eprintln!("       response body:");
        for line in body_preview(&response.body).lines() {
            eprintln!("         {line}");
        }
    }
}

pub(crate) fn warn(message: &str) {
    eprintln!("Warning: {message}");
}

pub(crate) fn note(message: &str) {
    eprintln!("{message}");
}

pub(crate) fn summary(passed: usize, failed: usize, total: usize, duration_ms: u64) {
    let line = "-".repeat(40);
    let status = if failed > 0 { "FAILED" } else { "PASSED" };

    eprintln!();
    eprintln!("{line}");
    eprintln!("  {status}  ({})", format_duration(duration_ms));
    eprintln!("  passed {passed}  failed {failed}  total {total}");
    eprintln!("{line}");
}

fn format_duration(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}

/// Pretty-print a response body, truncated for readability.
fn body_preview(body: &ResponseBody) -> String {
    let rendered = match body {
        ResponseBody::Json(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        ResponseBody::Text(text) => text.clone(),
    };

    let mut chars = rendered.char_indices();
    match chars.nth(BODY_PREVIEW_CHARS) {
        Some((cut, _)) => {
            let remaining = rendered.chars().count() - BODY_PREVIEW_CHARS;
            format!("{}… ({remaining} more chars)", &rendered[..cut])
        }
        None => rendered,
    }
}

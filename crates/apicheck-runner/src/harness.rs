//! Run harness
//!
//! Orchestrates a whole run across test modules: for each module it clears
//! the shared registry, evaluates the module, reconciles the two authoring
//! styles into one ordered list (registered tests win; an exported suite is
//! used only when the registry stays empty), runs the list, and collects
//! results for reporting. `finish` prints the summary, writes configured
//! reports, and returns the final counts; mapping them to a process exit
//! code stays with the caller.

use std::time::Instant;

use apicheck_core::{Collector, Config, ReportResult, ReportStatus, ReporterConfig, run_reporters};

use crate::http::elapsed_ms;
use crate::registry::{TestRegistry, TestSuite};
use crate::runner::{Runner, RunnerError, TestResult};
use crate::term;

/// Final counts for one whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    /// Conventional exit code: 0 when everything passed, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.failed > 0 { 1 } else { 0 }
    }
}

/// Drives test modules through one configured engine.
pub struct Harness {
    runner: Runner,
    registry: TestRegistry,
    collector: Collector,
    reporters: Option<ReporterConfig>,
    passed: usize,
    failed: usize,
    started: Instant,
}

impl Harness {
    /// Build a harness for one run.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the engine cannot be constructed, in
    /// particular when the configured OpenAPI document fails to load.
    pub fn new(config: &Config) -> Result<Self, RunnerError> {
        Ok(Self {
            runner: Runner::new(config)?,
            registry: TestRegistry::new(),
            collector: Collector::new(),
            reporters: config.reporters.clone(),
            passed: 0,
            failed: 0,
            started: Instant::now(),
        })
    }

    /// Evaluate one test module and run whatever it declares.
    ///
    /// The module function receives a cleared registry and may register
    /// tests into it (registration style), return a suite (suite style), or
    /// both; registered tests take precedence. A module declaring nothing
    /// is skipped with a warning. `label` names the module in output when
    /// no exported suite provides a name.
    pub fn run_module<F>(&mut self, label: &str, module: F) -> Vec<TestResult>
    where
        F: FnOnce(&mut TestRegistry) -> Option<TestSuite>,
    {
        self.registry.clear();
        let exported = module(&mut self.registry);

        let mut name = label.to_string();
        let mut tests = self.registry.list();
        if tests.is_empty() {
            if let Some(suite) = exported {
                name = suite.name;
                tests = suite.tests;
            }
        }

        if tests.is_empty() {
            term::warn(&format!("Skipping {label}: no tests found"));
            return Vec::new();
        }

        let suite_start = Instant::now();
        let results = self.runner.run_tests(&tests, &name);
        let duration_ms = elapsed_ms(suite_start);

        let report_results = results.iter().map(to_report_result).collect();
        self.collector.add_suite(&name, report_results, duration_ms);

        self.passed += results.iter().filter(|r| r.passed).count();
        self.failed += results.iter().filter(|r| !r.passed).count();

        results
    }

    /// Run a suite value directly.
    pub fn run_suite(&mut self, suite: TestSuite) -> Vec<TestResult> {
        let label = suite.name.clone();
        self.run_module(&label, |_| Some(suite))
    }

    /// Print the summary block, write configured reports, and return the
    /// final counts.
    pub fn finish(self) -> RunSummary {
        let duration_ms = elapsed_ms(self.started);
        let total = self.passed + self.failed;
        term::summary(self.passed, self.failed, total, duration_ms);

        match run_reporters(&self.collector.summary(), self.reporters.as_ref()) {
            Ok(paths) => {
                for path in paths {
                    term::note(&format!("Report written: {}", path.display()));
                }
            }
            Err(e) => term::warn(&format!("failed to write reports: {e}")),
        }

        RunSummary {
            passed: self.passed,
            failed: self.failed,
            total,
            duration_ms,
        }
    }
}

fn to_report_result(result: &TestResult) -> ReportResult {
    ReportResult {
        name: result.name.clone(),
        status: if result.passed {
            ReportStatus::Pass
        } else {
            ReportStatus::Fail
        },
        duration_ms: result.duration_ms,
        error: result.error.as_ref().map(ToString::to_string),
        response_body: result.response.as_ref().map(|r| r.body.as_value()),
    }
}

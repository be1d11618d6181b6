//! Execution engine
//!
//! Runs an ordered list of test cases strictly sequentially, one result per
//! test in input order. A failing test never aborts the suite: every error
//! raised by a test body (assertion, conformance, configuration, or
//! transport) is converted into a failed result for that one test.

use std::time::Instant;

use apicheck_core::{Config, TestError};

use crate::context::TestContext;
use crate::http::{ClientError, HttpClient, HttpResponse, elapsed_ms};
use crate::openapi::{SpecError, SpecValidator};
use crate::registry::TestCase;
use crate::term;

/// Outcome of one executed test. Created exactly once per test; immutable.
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    /// The failure, for failed tests
    pub error: Option<TestError>,
    /// Last response the test saw, for failed tests when available
    pub response: Option<HttpResponse>,
}

/// Engine construction failure.
///
/// A spec load failure aborts the whole run here, before any test executes:
/// no later test could succeed against a missing or malformed document.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Executes test cases against one shared client, validator, and
/// configuration.
pub struct Runner {
    client: HttpClient,
    validator: Option<SpecValidator>,
}

impl Runner {
    /// Build the shared HTTP client and, when configured, the conformance
    /// validator. The validator is constructed eagerly so a bad spec
    /// surfaces before any test runs.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the base URL is invalid or the OpenAPI
    /// document cannot be loaded.
    pub fn new(config: &Config) -> Result<Self, RunnerError> {
        let client = HttpClient::new(config)?;
        let validator = match &config.openapi {
            Some(openapi) => Some(SpecValidator::from_file(&openapi.spec_path, openapi.strict)?),
            None => None,
        };
        Ok(Self { client, validator })
    }

    /// Run every test in order and return one result per test, in the same
    /// order.
    pub fn run_tests(&mut self, tests: &[TestCase], suite_label: &str) -> Vec<TestResult> {
        term::suite_header(suite_label);

        let client = &self.client;
        let validator = &mut self.validator;
        let mut results = Vec::with_capacity(tests.len());

        for case in tests {
            let start = Instant::now();
            let mut ctx = TestContext::new(client, validator.as_mut());

            let outcome = (case.run)(&mut ctx);
            let duration_ms = elapsed_ms(start);
            let response = ctx.into_last_response();

            match outcome {
                Ok(()) => {
                    term::test_pass(&case.name, duration_ms);
                    results.push(TestResult {
                        name: case.name.clone(),
                        passed: true,
                        duration_ms,
                        error: None,
                        response: None,
                    });
                }
                Err(error) => {
                    term::test_fail(&case.name, duration_ms, &error, response.as_ref());
                    results.push(TestResult {
                        name: case.name.clone(),
                        passed: false,
                        duration_ms,
                        error: Some(error),
                        response,
                    });
                }
            }
        }

        results
    }

    /// The conformance validator, when one is configured.
    #[must_use]
    pub fn validator(&self) -> Option<&SpecValidator> {
        self.validator.as_ref()
    }
}

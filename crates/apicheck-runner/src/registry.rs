//! Test declaration and registration
//!
//! Two authoring styles produce the same thing, an ordered list of
//! [`TestCase`]s:
//!
//! - registration style: a module function calls [`TestRegistry::register`]
//!   repeatedly on a registry the harness hands it;
//! - suite style: a module function returns a [`TestSuite`] value directly.
//!
//! The registry is an explicit, caller-owned accumulator; there is no
//! process-wide singleton. Callers that reuse one registry across modules
//! must follow the clear-then-evaluate-then-read sequence themselves;
//! reading without a prior [`TestRegistry::clear`] accumulates stale
//! entries from the previous module.

use std::fmt;
use std::sync::Arc;

use apicheck_core::TestError;

use crate::context::TestContext;

/// A test body: runs against a fresh per-test context.
pub type TestFn = Arc<dyn Fn(&mut TestContext<'_>) -> Result<(), TestError> + Send + Sync>;

/// One declared test case. Immutable after creation.
#[derive(Clone)]
pub struct TestCase {
    pub name: String,
    pub run: TestFn,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(&mut TestContext<'_>) -> Result<(), TestError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// A named group of test cases, exported as a value (suite style).
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Append one test. Builder style for suite literals.
    #[must_use]
    pub fn with_test(
        mut self,
        name: impl Into<String>,
        run: impl Fn(&mut TestContext<'_>) -> Result<(), TestError> + Send + Sync + 'static,
    ) -> Self {
        self.tests.push(TestCase::new(name, run));
        self
    }
}

/// Ordered, insertion-order-preserving list of declared tests.
#[derive(Default)]
pub struct TestRegistry {
    tests: Vec<TestCase>,
}

impl TestRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a test case declared by name and body.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        run: impl Fn(&mut TestContext<'_>) -> Result<(), TestError> + Send + Sync + 'static,
    ) {
        self.tests.push(TestCase::new(name, run));
    }

    /// Append an already-constructed case.
    pub fn register_case(&mut self, case: TestCase) {
        self.tests.push(case);
    }

    /// Independent shallow copy of the registered cases, in insertion
    /// order. Mutating the returned list never affects the registry.
    #[must_use]
    pub fn list(&self) -> Vec<TestCase> {
        self.tests.clone()
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        self.tests.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

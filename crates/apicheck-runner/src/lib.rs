//! apicheck-runner: HTTP execution engine and OpenAPI conformance validator
//!
//! Tests are declared against a [`TestRegistry`] (or exported as a
//! [`TestSuite`]), executed strictly sequentially by the [`Runner`], and
//! orchestrated across modules by the [`Harness`]:
//!
//! ```no_run
//! use apicheck_core::Config;
//! use apicheck_runner::Harness;
//!
//! let config = Config::load_default()?;
//! let mut harness = Harness::new(&config)?;
//!
//! harness.run_module("users", |tests| {
//!     tests.register("GET /users/1", |ctx| {
//!         let response = ctx.get("/users/1")?;
//!         ctx.expect(&response).to_have_status(200)?;
//!         Ok(())
//!     });
//!     None
//! });
//!
//! std::process::exit(harness.finish().exit_code());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod context;
pub mod harness;
pub mod http;
pub mod openapi;
pub mod registry;
pub mod runner;

mod term;

pub use context::TestContext;
pub use harness::{Harness, RunSummary};
pub use http::{ClientError, HttpClient, HttpRequest, HttpResponse, Method, ResponseBody};
pub use openapi::{SpecError, SpecValidator};
pub use registry::{TestCase, TestFn, TestRegistry, TestSuite};
pub use runner::{Runner, RunnerError, TestResult};

// Test authors get the assertion entrypoint without importing two crates.
pub use apicheck_core::{AssertionError, Config, Expect, FailureKind, TestError, expect};

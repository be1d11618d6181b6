//! apicheck-core: Core types for API conformance testing
//!
//! This crate provides the project configuration, the assertion engine, the
//! per-test failure taxonomy, and the report data model with its JSON/HTML
//! writers. It knows nothing about HTTP or OpenAPI; those live in
//! `apicheck-runner`.

pub mod assert;
pub mod config;
pub mod error;
pub mod report;

pub use assert::{AssertionError, Expect, expect};
pub use config::{Config, ConfigError, OpenApiConfig, ReporterConfig};
pub use error::{FailureKind, TestError};
pub use report::{
    Collector, ReportError, ReportResult, ReportStatus, ReportSuite, ReportSummary, run_reporters,
};

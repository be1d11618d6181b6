//! Per-test failure taxonomy
//!
//! Every way a single test can fail is one variant of [`TestError`]. The
//! execution engine converts any of them into a failed result for that one
//! test; none of them aborts the rest of the suite. Spec-document load
//! problems are deliberately *not* part of this taxonomy: they abort the
//! whole run before any test executes.

use crate::assert::AssertionError;

/// A failure terminal to exactly one test.
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    /// Expected vs. actual mismatch from the assertion engine
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// Response body does not satisfy the schema resolved for its
    /// (method, path, status)
    #[error("{message}")]
    Conformance { message: String },

    /// Validation was required but could not be performed: no schema under
    /// strict mode, or a defective spec reference
    #[error("{message}")]
    Configuration { message: String },

    /// Network, timeout, or DNS failure; carries elapsed time and cause
    #[error("{message} (after {duration_ms}ms)")]
    Transport { message: String, duration_ms: u64 },
}

/// Failure classification tag for reporting.
///
/// Lets the reporting layer branch on failure kind without inspecting
/// message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Assertion,
    Conformance,
    Configuration,
    Transport,
}

impl TestError {
    /// Classification tag for this failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Assertion(_) => FailureKind::Assertion,
            Self::Conformance { .. } => FailureKind::Conformance,
            Self::Configuration { .. } => FailureKind::Configuration,
            Self::Transport { .. } => FailureKind::Transport,
        }
    }

    /// The underlying assertion failure, when this is one.
    ///
    /// Reporting uses the expected/actual pair to render a diff instead of
    /// the raw message.
    #[must_use]
    pub fn assertion(&self) -> Option<&AssertionError> {
        match self {
            Self::Assertion(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::expect;

    #[test]
    fn assertion_error_converts() {
        let err: TestError = expect(200).to_be(201).unwrap_err().into();
        assert_eq!(err.kind(), FailureKind::Assertion);
        assert!(err.assertion().is_some());
    }

    #[test]
    fn kinds_are_distinct() {
        let conformance = TestError::Conformance {
            message: "body mismatch".into(),
        };
        let configuration = TestError::Configuration {
            message: "no schema".into(),
        };
        let transport = TestError::Transport {
            message: "connection refused".into(),
            duration_ms: 12,
        };

        assert_eq!(conformance.kind(), FailureKind::Conformance);
        assert_eq!(configuration.kind(), FailureKind::Configuration);
        assert_eq!(transport.kind(), FailureKind::Transport);
        assert!(conformance.assertion().is_none());
    }

    #[test]
    fn transport_display_includes_elapsed() {
        let err = TestError::Transport {
            message: "timed out".into(),
            duration_ms: 5000,
        };
        assert_eq!(err.to_string(), "timed out (after 5000ms)");
    }
}

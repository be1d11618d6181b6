//! Assertion engine — predicate checks over captured values
//!
//! Assertions wrap one actual value (anything serializable) and expose
//! independent predicate checks. A failing predicate returns an
//! [`AssertionError`] carrying the expected and actual values separately so
//! the reporting layer can render a diff; it never panics.

use serde::Serialize;
use serde_json::Value;

/// A failed assertion: expected vs. actual mismatch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct AssertionError {
    /// Human-readable mismatch description
    pub message: String,
    /// What the predicate wanted
    pub expected: Value,
    /// What the wrapped value actually was
    pub actual: Value,
}

impl AssertionError {
    fn new(message: impl Into<String>, expected: Value, actual: Value) -> Self {
        Self {
            message: message.into(),
            expected,
            actual,
        }
    }
}

/// Convert any serializable value into a JSON value for comparison.
///
/// Values that cannot be represented as JSON (e.g. maps with non-string
/// keys) degrade to `null` rather than failing the test for the wrong
/// reason.
fn json(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Entry point: wrap an actual value for assertion.
///
/// ```
/// use apicheck_core::expect;
///
/// expect(200).to_be(200).unwrap();
/// assert!(expect(200).to_be(201).is_err());
/// ```
pub fn expect<T: Serialize>(actual: T) -> Expect {
    Expect {
        actual: json(actual),
    }
}

/// Wraps one actual value and exposes predicate checks.
#[derive(Debug, Clone)]
pub struct Expect {
    actual: Value,
}

impl Expect {
    /// The wrapped value.
    #[must_use]
    pub fn actual(&self) -> &Value {
        &self.actual
    }

    /// Value equality.
    pub fn to_be<T: Serialize>(&self, expected: T) -> Result<(), AssertionError> {
        let expected = json(expected);
        if self.actual != expected {
            return Err(AssertionError::new(
                format!("Expected {expected} but got {}", self.actual),
                expected,
                self.actual.clone(),
            ));
        }
        Ok(())
    }

    /// Deep structural equality via canonical serialization comparison.
    pub fn to_equal<T: Serialize>(&self, expected: T) -> Result<(), AssertionError> {
        let expected = json(expected);
        let expected_str = expected.to_string();
        let actual_str = self.actual.to_string();
        if actual_str != expected_str {
            return Err(AssertionError::new(
                format!("Expected {expected_str} but got {actual_str}"),
                expected,
                self.actual.clone(),
            ));
        }
        Ok(())
    }

    /// Substring containment; the wrapped value must be a string.
    pub fn to_contain(&self, substring: &str) -> Result<(), AssertionError> {
        let contained = self
            .actual
            .as_str()
            .is_some_and(|s| s.contains(substring));
        if !contained {
            return Err(AssertionError::new(
                format!("Expected {} to contain \"{substring}\"", self.actual),
                Value::String(substring.to_string()),
                self.actual.clone(),
            ));
        }
        Ok(())
    }

    /// Status-equality convenience check for response-shaped values.
    ///
    /// The wrapped value is expected to carry a numeric `status` field, as
    /// serialized responses do.
    pub fn to_have_status(&self, expected: u16) -> Result<(), AssertionError> {
        let actual_status = self.actual.get("status").cloned().unwrap_or(Value::Null);
        if actual_status != json(expected) {
            return Err(AssertionError::new(
                format!("Expected status {expected} but got {actual_status}"),
                json(expected),
                actual_status,
            ));
        }
        Ok(())
    }

    /// JSON truthiness: `null`, `false`, numeric zero, and `""` are falsy.
    pub fn to_be_truthy(&self) -> Result<(), AssertionError> {
        let falsy = match &self.actual {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(_) | Value::Object(_) => false,
        };
        if falsy {
            return Err(AssertionError::new(
                format!("Expected value to be truthy but got {}", self.actual),
                Value::String("truthy value".to_string()),
                self.actual.clone(),
            ));
        }
        Ok(())
    }

    /// Presence of a named property; the wrapped value must be an object.
    pub fn to_have_property(&self, key: &str) -> Result<(), AssertionError> {
        let present = self
            .actual
            .as_object()
            .is_some_and(|obj| obj.contains_key(key));
        if !present {
            return Err(AssertionError::new(
                format!("Expected object to have property \"{key}\""),
                Value::String(format!("object with property \"{key}\"")),
                self.actual.clone(),
            ));
        }
        Ok(())
    }
}

//! OpenAPI conformance validation
//!
//! [`SpecValidator`] owns one parsed OpenAPI 3.x document and a strictness
//! flag. For every intercepted request it resolves the JSON Schema declared
//! for the (method, path, status) triple, compiles it once per triple, and
//! validates the response body against it.
//!
//! ```no_run
//! use apicheck_runner::openapi::SpecValidator;
//!
//! let mut validator = SpecValidator::from_file("openapi.json".as_ref(), true)?;
//! validator.validate("GET", "/pokemon/ditto", 200, &serde_json::json!({"id": 132}))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod extract;
mod pointer;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use serde_json::Value;

use apicheck_core::TestError;

pub use pointer::{RefError, inline_refs, resolve_pointer};

/// OpenAPI document load failure.
///
/// Fatal at validator construction: no test could succeed against a missing
/// or malformed spec, so this aborts the whole run before any test executes.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("Spec file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read spec file {0}: {1}")]
    Io(PathBuf, String),
    #[error("Spec file is not valid JSON: {0}")]
    Parse(String),
}

/// Validates response bodies against schemas declared in one OpenAPI
/// document.
#[derive(Debug)]
pub struct SpecValidator {
    document: Value,
    strict: bool,
    /// "METHOD:path:status" → compiled validator. Grows monotonically,
    /// bounded by the distinct triples actually exercised.
    cache: HashMap<String, jsonschema::Validator>,
    compile_count: usize,
}

impl SpecValidator {
    /// Load and parse the spec document eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] if the file is missing, unreadable, or not
    /// valid JSON.
    pub fn from_file(path: &Path, strict: bool) -> Result<Self, SpecError> {
        if !path.exists() {
            return Err(SpecError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SpecError::Io(path.to_path_buf(), e.to_string()))?;
        let document = serde_json::from_str(&raw).map_err(|e| SpecError::Parse(e.to_string()))?;
        Ok(Self::from_document(document, strict))
    }

    /// Build a validator from an already-parsed document.
    #[must_use]
    pub fn from_document(document: Value, strict: bool) -> Self {
        Self {
            document,
            strict,
            cache: HashMap::new(),
            compile_count: 0,
        }
    }

    /// Validate one response body.
    ///
    /// Resolution may yield no schema; under strict mode that is a
    /// [`TestError::Configuration`] failure, under lenient mode a silent
    /// success. A resolved schema is compiled once per
    /// (method, path, status) and reused from the cache afterwards.
    ///
    /// # Errors
    ///
    /// [`TestError::Conformance`] when the body violates the schema, with
    /// one bullet line per violation; [`TestError::Configuration`] when a
    /// required schema is missing or the document's references are
    /// defective.
    pub fn validate(
        &mut self,
        method: &str,
        request_path: &str,
        status: u16,
        body: &Value,
    ) -> Result<(), TestError> {
        let method = method.to_ascii_uppercase();

        let schema = extract::extract_schema(&self.document, &method, request_path, status)
            .map_err(|e| TestError::Configuration {
                message: format!(
                    "Defective schema reference for {method} {request_path} -> {status}: {e}"
                ),
            })?;

        let Some(schema) = schema else {
            if self.strict {
                return Err(TestError::Configuration {
                    message: format!(
                        "No schema found for {method} {request_path} -> {status}. \
                         Strict mode requires a schema; set strict = false to skip \
                         validation when a schema is missing."
                    ),
                });
            }
            return Ok(());
        };

        let cache_key = format!("{method}:{request_path}:{status}");
        let validator = match self.cache.entry(cache_key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let compiled =
                    jsonschema::validator_for(&schema).map_err(|e| TestError::Configuration {
                        message: format!(
                            "Cannot compile schema for {method} {request_path} -> {status}: {e}"
                        ),
                    })?;
                self.compile_count += 1;
                entry.insert(compiled)
            }
        };

        let violations: Vec<String> = validator
            .iter_errors(body)
            .map(|err| {
                let location = err.instance_path().to_string();
                let location = if location.is_empty() {
                    "(root)".to_string()
                } else {
                    location
                };
                format!("  - {location}: {err}")
            })
            .collect();

        if !violations.is_empty() {
            return Err(TestError::Conformance {
                message: format!(
                    "Response body failed schema validation:\n{}",
                    violations.join("\n")
                ),
            });
        }

        Ok(())
    }

    /// Number of schema compilations performed so far.
    #[must_use]
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    /// Number of compiled validators currently cached.
    #[must_use]
    pub fn cached_validators(&self) -> usize {
        self.cache.len()
    }
}

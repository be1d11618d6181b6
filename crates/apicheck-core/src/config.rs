//! Project configuration for API conformance testing

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Project configuration
///
/// Loaded once per run and shared read-only across all tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL that relative request URLs are resolved against
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds (disabled by default)
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Default HTTP headers (auth, API keys, etc.)
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// OpenAPI conformance validation (disabled when absent)
    #[serde(default)]
    pub openapi: Option<OpenApiConfig>,

    /// Report writers run after the suite finishes (disabled when absent)
    #[serde(default)]
    pub reporters: Option<ReporterConfig>,
}

/// OpenAPI validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiConfig {
    /// Path to the OpenAPI 3.x document (local JSON file)
    pub spec_path: PathBuf,

    /// Fail tests whose (method, path, status) has no declared schema
    #[serde(default)]
    pub strict: bool,
}

/// Report output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Output directory (default: "apicheck-reports")
    #[serde(default)]
    pub out_dir: Option<PathBuf>,

    /// Write report.json
    #[serde(default)]
    pub json: bool,

    /// Write report.html
    #[serde(default)]
    pub html: bool,
}

impl ReporterConfig {
    /// Effective output directory.
    #[must_use]
    pub fn out_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("apicheck-reports"))
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.apicheck.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".apicheck.toml", ".apicheck.json", "apicheck.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        // No config file, return default
        Ok(Self::default())
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# apicheck configuration

# Base URL for relative request URLs
base_url = "http://localhost:8080"

# Per-request timeout in milliseconds
timeout_ms = 30000

# Default HTTP headers (auth, api keys)
[headers]
# Authorization = "Bearer your-token-here"
# X-API-Key = "your-api-key"

# OpenAPI conformance validation
# strict = true fails any test whose response has no declared schema
[openapi]
spec_path = "openapi.json"
strict = false

# Report writers (run after the suite finishes)
[reporters]
out_dir = "apicheck-reports"
json = true
html = false
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}

//! Test stub generation from an OpenAPI document
//!
//! Walks the spec's paths, groups operations by their first non-parameter
//! path segment, and writes one `register`-function stub module per
//! operation. Existing files are left alone unless `--force` is given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

const HTTP_METHODS: &[&str] = &["get", "post", "put", "delete", "patch"];

/// One operation found in the spec.
#[derive(Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
    /// Grouping directory: first non-parameter path segment
    pub segment: String,
}

/// Files written and skipped by one generation run.
#[derive(Debug, Default)]
pub struct GenerateOutcome {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Generate stub modules for every operation in the spec.
///
/// # Errors
///
/// Returns error if the spec cannot be read or parsed, or output files
/// cannot be written.
pub fn generate_stubs(spec_path: &Path, out_dir: &Path, force: bool) -> Result<GenerateOutcome> {
    let raw = std::fs::read_to_string(spec_path)
        .with_context(|| format!("cannot read spec {}", spec_path.display()))?;
    let spec: Value = serde_json::from_str(&raw)
        .with_context(|| format!("spec {} is not valid JSON", spec_path.display()))?;

    let endpoints = parse_endpoints(&spec);
    let mut outcome = GenerateOutcome::default();

    for endpoint in &endpoints {
        let group_dir = out_dir.join(&endpoint.segment);
        std::fs::create_dir_all(&group_dir)
            .with_context(|| format!("cannot create {}", group_dir.display()))?;

        let file_path = group_dir.join(module_file_name(&endpoint.method, &endpoint.path));
        if file_path.exists() && !force {
            outcome.skipped.push(file_path);
            continue;
        }

        let content = render_stub(&endpoint.method, &endpoint.path);
        std::fs::write(&file_path, content)
            .with_context(|| format!("cannot write {}", file_path.display()))?;
        outcome.written.push(file_path);
    }

    Ok(outcome)
}

/// Every (method, path) operation declared under `paths`.
pub fn parse_endpoints(spec: &Value) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();

    let Some(paths) = spec.get("paths").and_then(|p| p.as_object()) else {
        return endpoints;
    };

    for (path, path_item) in paths {
        for method in HTTP_METHODS {
            if path_item.get(*method).is_some() {
                endpoints.push(Endpoint {
                    method: method.to_uppercase(),
                    path: path.clone(),
                    segment: extract_segment(path),
                });
            }
        }
    }

    endpoints
}

/// First non-parameter segment of a path, used as the grouping directory.
fn extract_segment(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty())
        .find(|part| !part.starts_with('{'))
        .map_or_else(|| "root".to_string(), sanitize)
}

/// `GET /users/{id}` → `get_users_id.rs`
pub fn module_file_name(method: &str, path: &str) -> String {
    let sanitized = sanitize(&path.replace(['{', '}'], ""));
    let sanitized = sanitized.trim_matches('_');
    if sanitized.is_empty() {
        format!("{}_root.rs", method.to_lowercase())
    } else {
        format!("{}_{sanitized}.rs", method.to_lowercase())
    }
}

/// Keep module names to `[a-z0-9_]`.
fn sanitize(part: &str) -> String {
    part.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// One stub module: a `register` function declaring one test.
pub fn render_stub(method: &str, path: &str) -> String {
    let call = match method {
        "POST" | "PUT" | "PATCH" => {
            format!("{}(\"{path}\", serde_json::json!({{}}))", method.to_lowercase())
        }
        _ => format!("{}(\"{path}\")", method.to_lowercase()),
    };

    format!(
        r#"//! Generated test stub for {method} {path}

use apicheck_runner::TestRegistry;

pub fn register(tests: &mut TestRegistry) {{
    tests.register("{method} {path}", |ctx| {{
        let response = ctx.{call}?;
        ctx.expect(&response).to_have_status(200)?;
        Ok(())
    }});
}}
"#
    )
}

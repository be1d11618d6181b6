//! Blocking HTTP client
//!
//! Issues one call per request descriptor against the configured base URL.
//! Every response carries its elapsed wall-clock time; failures surface as
//! [`TestError::Transport`] carrying the elapsed time and the cause.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use url::Url;

use apicheck_core::{Config, TestError};

pub use reqwest::Method;

/// Request descriptor. Value type, constructed per call.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Absolute URL, or a path resolved against the configured base URL
    pub url: String,
    pub method: Method,
    /// Request headers; a `None` value is explicitly absent and is dropped
    /// at merge time, leaving any configured value in place
    pub headers: BTreeMap<String, Option<String>>,
    /// Query parameters appended to the resolved URL
    pub query: Vec<(String, String)>,
    /// JSON body; omitted entirely when absent
    pub body: Option<Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: BTreeMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Some(value.into()));
        self
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Response body classified by declared content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// The body as a JSON value; text becomes a JSON string.
    #[must_use]
    pub fn as_value(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// Normalized response. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: ResponseBody,
    /// Elapsed wall-clock time in milliseconds
    pub duration_ms: u64,
}

/// HTTP client construction error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid base_url \"{0}\": {1}")]
    BaseUrl(String, String),
    #[error("HTTP client build failed: {0}")]
    Build(String),
}

/// Issues one HTTP call per request descriptor.
pub struct HttpClient {
    inner: reqwest::blocking::Client,
    base_url: Option<Url>,
    default_headers: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Build a client from the shared run configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configured base URL is not parseable or the
    /// underlying client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let base_url = match &config.base_url {
            Some(raw) => Some(
                Url::parse(raw).map_err(|e| ClientError::BaseUrl(raw.clone(), e.to_string()))?,
            ),
            None => None,
        };

        let inner = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            inner,
            base_url,
            default_headers: config.headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            timeout: config.timeout_ms.map(Duration::from_millis),
        })
    }

    /// Resolve a request URL against the configured base URL.
    ///
    /// Absolute URLs are used as-is; anything else is joined onto
    /// `base_url` when one is configured.
    pub(crate) fn resolve_url(&self, raw: &str) -> Result<Url, String> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Url::parse(raw).map_err(|e| format!("Invalid URL \"{raw}\": {e}"));
        }
        match &self.base_url {
            Some(base) => base
                .join(raw)
                .map_err(|e| format!("Cannot resolve \"{raw}\" against {base}: {e}")),
            None => {
                Url::parse(raw).map_err(|e| format!("Invalid URL \"{raw}\" (no base_url configured): {e}"))
            }
        }
    }

    /// Merge headers: default Content-Type, then configuration, then
    /// request-level (request wins). Explicitly absent request values are
    /// dropped.
    fn merged_headers(&self, request: &HttpRequest) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }
        for (name, value) in &request.headers {
            if let Some(value) = value {
                headers.insert(name.clone(), value.clone());
            }
        }
        headers
    }

    /// Issue one HTTP call.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::Transport`] on network failure, timeout, URL
    /// resolution failure, or a non-parseable body claimed as JSON. The
    /// error carries the elapsed time.
    pub fn request(&self, request: HttpRequest) -> Result<HttpResponse, TestError> {
        let start = Instant::now();
        self.execute(request, start).map_err(|message| TestError::Transport {
            message,
            duration_ms: elapsed_ms(start),
        })
    }

    fn execute(&self, request: HttpRequest, start: Instant) -> Result<HttpResponse, String> {
        let mut url = self.resolve_url(&request.url)?;
        for (name, value) in &request.query {
            url.query_pairs_mut().append_pair(name, value);
        }

        let mut builder = self.inner.request(request.method.clone(), url);
        for (name, value) in self.merged_headers(&request) {
            // Values that are invalid in HTTP never reach the server; skip
            // them rather than failing the whole request.
            if reqwest::header::HeaderValue::from_str(&value).is_ok() {
                builder = builder.header(&name, &value);
            }
        }
        if let Some(body) = &request.body {
            let serialized =
                serde_json::to_string(body).map_err(|e| format!("Cannot serialize body: {e}"))?;
            builder = builder.body(serialized);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string();

        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            headers.insert(
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).to_string(),
            );
        }

        let is_json = headers
            .get("content-type")
            .is_some_and(|ct| is_json_content_type(ct));

        let text = response.text().map_err(|e| e.to_string())?;
        let body = if is_json && !text.is_empty() {
            ResponseBody::Json(
                serde_json::from_str(&text)
                    .map_err(|e| format!("Content-Type is JSON but body is not: {e}"))?,
            )
        } else {
            ResponseBody::Text(text)
        };

        Ok(HttpResponse {
            status,
            status_text,
            headers,
            body,
            duration_ms: elapsed_ms(start),
        })
    }

    /// GET convenience wrapper.
    pub fn get(&self, url: impl Into<String>) -> Result<HttpResponse, TestError> {
        self.request(HttpRequest::new(Method::GET, url))
    }

    /// POST convenience wrapper.
    pub fn post(&self, url: impl Into<String>, body: Value) -> Result<HttpResponse, TestError> {
        self.request(HttpRequest::new(Method::POST, url).with_body(body))
    }

    /// PUT convenience wrapper.
    pub fn put(&self, url: impl Into<String>, body: Value) -> Result<HttpResponse, TestError> {
        self.request(HttpRequest::new(Method::PUT, url).with_body(body))
    }

    /// PATCH convenience wrapper.
    pub fn patch(&self, url: impl Into<String>, body: Value) -> Result<HttpResponse, TestError> {
        self.request(HttpRequest::new(Method::PATCH, url).with_body(body))
    }

    /// DELETE convenience wrapper.
    pub fn delete(&self, url: impl Into<String>) -> Result<HttpResponse, TestError> {
        self.request(HttpRequest::new(Method::DELETE, url))
    }
}

/// Media types that are parsed as JSON: `application/json` and `+json`
/// suffixed types.
fn is_json_content_type(content_type: &str) -> bool {
    let media = content_type.split(';').next().unwrap_or("").trim();
    media.eq_ignore_ascii_case("application/json") || media.to_ascii_lowercase().ends_with("+json")
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

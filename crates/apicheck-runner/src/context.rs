//! Per-test execution context
//!
//! Built fresh for every test invocation and discarded afterwards. The
//! context funnels every verb helper through one underlying [`send`]
//! operation, which intercepts the outgoing request for conformance
//! checking and remembers the last response seen for failure reporting.
//!
//! [`send`]: TestContext::send

use serde::Serialize;
use serde_json::Value;
use url::Url;

use apicheck_core::{Expect, TestError, expect};

use crate::http::{HttpClient, HttpRequest, HttpResponse, Method};
use crate::openapi::SpecValidator;

/// Placeholder base for deriving the path component of relative URLs.
const PLACEHOLDER_BASE: &str = "http://localhost";

/// Request facade and assertion entrypoint for one test execution.
pub struct TestContext<'a> {
    client: &'a HttpClient,
    validator: Option<&'a mut SpecValidator>,
    last_response: Option<HttpResponse>,
}

impl<'a> TestContext<'a> {
    pub(crate) fn new(client: &'a HttpClient, validator: Option<&'a mut SpecValidator>) -> Self {
        Self {
            client,
            validator,
            last_response: None,
        }
    }

    /// Issue one request: the single operation every verb helper funnels
    /// through.
    ///
    /// The response is remembered as the last one seen by this test. When a
    /// conformance validator is configured, the response is validated
    /// against the schema declared for (method, path component, status); a
    /// validation failure propagates exactly like an assertion failure.
    ///
    /// # Errors
    ///
    /// Transport failures from the client, or conformance/configuration
    /// failures from the validator.
    pub fn send(&mut self, request: HttpRequest) -> Result<HttpResponse, TestError> {
        let method = request.method.clone();
        let raw_url = request.url.clone();

        let response = self.client.request(request)?;
        self.last_response = Some(response.clone());

        if let Some(validator) = self.validator.as_deref_mut() {
            let path = path_component(&raw_url);
            validator.validate(
                method.as_str(),
                &path,
                response.status,
                &response.body.as_value(),
            )?;
        }

        Ok(response)
    }

    /// GET convenience operation.
    pub fn get(&mut self, url: impl Into<String>) -> Result<HttpResponse, TestError> {
        self.send(HttpRequest::new(Method::GET, url))
    }

    /// POST convenience operation.
    pub fn post(&mut self, url: impl Into<String>, body: Value) -> Result<HttpResponse, TestError> {
        self.send(HttpRequest::new(Method::POST, url).with_body(body))
    }

    /// PUT convenience operation.
    pub fn put(&mut self, url: impl Into<String>, body: Value) -> Result<HttpResponse, TestError> {
        self.send(HttpRequest::new(Method::PUT, url).with_body(body))
    }

    /// PATCH convenience operation.
    pub fn patch(&mut self, url: impl Into<String>, body: Value) -> Result<HttpResponse, TestError> {
        self.send(HttpRequest::new(Method::PATCH, url).with_body(body))
    }

    /// DELETE convenience operation.
    pub fn delete(&mut self, url: impl Into<String>) -> Result<HttpResponse, TestError> {
        self.send(HttpRequest::new(Method::DELETE, url))
    }

    /// Assertion entrypoint.
    #[must_use]
    pub fn expect<T: Serialize>(&self, actual: T) -> Expect {
        expect(actual)
    }

    /// Last response seen by this test, if any.
    #[must_use]
    pub fn last_response(&self) -> Option<&HttpResponse> {
        self.last_response.as_ref()
    }

    pub(crate) fn into_last_response(self) -> Option<HttpResponse> {
        self.last_response
    }
}

/// Derive the path component of a request URL: strip scheme, host, and
/// query, resolving relative URLs against a placeholder host.
fn path_component(raw: &str) -> String {
    if let Ok(url) = Url::parse(raw) {
        return url.path().to_string();
    }
    if let Ok(base) = Url::parse(PLACEHOLDER_BASE) {
        if let Ok(url) = base.join(raw) {
            return url.path().to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_component_of_absolute_url() {
        assert_eq!(
            path_component("https://pokeapi.co/api/v2/pokemon/ditto?limit=1"),
            "/api/v2/pokemon/ditto"
        );
    }

    #[test]
    fn path_component_of_relative_url() {
        assert_eq!(path_component("/users/1?full=true"), "/users/1");
        assert_eq!(path_component("users/1"), "/users/1");
    }

    #[test]
    fn path_component_of_bare_host() {
        assert_eq!(path_component("http://example.com"), "/");
    }
}

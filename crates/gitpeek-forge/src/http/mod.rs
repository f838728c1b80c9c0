//! HTTP transport seam.
//!
//! Adapters only describe requests ([`ApiRequest`]); a [`RequestExecutor`]
//! performs them. Production code uses [`UreqExecutor`], tests use
//! `MockExecutor` (behind the `mock` feature).

mod agent;
#[cfg(feature = "mock")]
mod mock;

use tracing::debug;

use crate::error::ForgeError;

pub use agent::UreqExecutor;
#[cfg(feature = "mock")]
pub use mock::{MockExecutor, RecordedRequest};

/// Header name/value pairs, in send order.
pub type Headers = Vec<(String, String)>;

/// Status and body of a completed HTTP exchange.
///
/// Any status, including 4xx/5xx, is a successful exchange at this level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs network calls on behalf of the render engine.
///
/// Implementations own retries, TLS and timeouts. They must return HTTP
/// error statuses as [`HttpResponse`] values and reserve `Err` for
/// failures that produced no response.
pub trait RequestExecutor: Send + Sync {
    /// Send a GET request.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<HttpResponse, ForgeError>;

    /// Send a POST request with a JSON body.
    fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, ForgeError>;
}

/// A GET request against a provider API, built by an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub headers: Headers,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Start a request for `url` with no headers or query.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    /// Add an `Authorization` header when one is available.
    #[must_use]
    pub fn authorization(self, value: Option<String>) -> Self {
        match value {
            Some(v) => self.header("Authorization", v),
            None => self,
        }
    }

    /// Add a query parameter (encoded by the executor).
    #[must_use]
    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_owned(), value.into()));
        self
    }

    /// Look up a header value by name (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a query parameter by name.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Execute the request.
    pub fn send(&self, executor: &dyn RequestExecutor) -> Result<HttpResponse, ForgeError> {
        debug!("GET {}", self.url);
        let response = executor.get(&self.url, &self.headers, &self.query)?;
        debug!("GET {} -> {}", self.url, response.status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_builder() {
        let request = ApiRequest::get("https://api.example.com/x")
            .header("Accept", "application/json")
            .authorization(None)
            .query("ref", "main");

        assert_eq!(request.url, "https://api.example.com/x");
        assert_eq!(request.header_value("accept"), Some("application/json"));
        assert_eq!(request.header_value("Authorization"), None);
        assert_eq!(request.query_value("ref"), Some("main"));
    }

    #[test]
    fn test_authorization_added_when_present() {
        let request = ApiRequest::get("u").authorization(Some("Bearer t".to_owned()));
        assert_eq!(request.header_value("Authorization"), Some("Bearer t"));
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(201, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }
}

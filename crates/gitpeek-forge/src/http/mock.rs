//! Mock transport for testing.
//!
//! Provides [`MockExecutor`] for unit testing without network access.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{HttpResponse, RequestExecutor};
use crate::error::ForgeError;

/// A request seen by [`MockExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// `GET` or `POST`.
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// JSON body for POST requests.
    pub body: Option<serde_json::Value>,
}

impl RecordedRequest {
    /// Look up a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
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
}

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    TransportError(String),
}

/// Mock executor for testing.
///
/// Replies are keyed by method and URL (query parameters are ignored for
/// matching but recorded). Requests without a configured reply fail with
/// [`ForgeError::Transport`] so a missing fixture is never mistaken for a
/// provider answer.
///
/// # Example
///
/// ```ignore
/// use gitpeek_forge::{MockExecutor, RequestExecutor};
///
/// let executor = MockExecutor::new()
///     .with_get("https://api.github.com/repos/o/r/commits", 200, "[]");
///
/// let response = executor.get("https://api.github.com/repos/o/r/commits", &[], &[]).unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(executor.requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockExecutor {
    replies: RwLock<HashMap<(&'static str, String), Reply>>,
    requests: RwLock<Vec<RecordedRequest>>,
}

impl MockExecutor {
    /// Create a new mock with no configured replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `GET url` with the given status and body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_get(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.replies.write().unwrap().insert(
            ("GET", url.into()),
            Reply::Response(HttpResponse::new(status, body)),
        );
        self
    }

    /// Reply to `POST url` with the given status and body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_post(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.replies.write().unwrap().insert(
            ("POST", url.into()),
            Reply::Response(HttpResponse::new(status, body)),
        );
        self
    }

    /// Fail `GET url` with a transport error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_get_failure(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.replies
            .write()
            .unwrap()
            .insert(("GET", url.into()), Reply::TransportError(message.into()));
        self
    }

    /// All requests received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().unwrap().clone()
    }

    fn reply(&self, request: RecordedRequest) -> Result<HttpResponse, ForgeError> {
        let key = (request.method, request.url.clone());
        self.requests.write().unwrap().push(request);

        match self.replies.read().unwrap().get(&key) {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::TransportError(message)) => Err(ForgeError::Transport(message.clone())),
            None => Err(ForgeError::Transport(format!(
                "no mock reply for {} {}",
                key.0, key.1
            ))),
        }
    }
}

impl RequestExecutor for MockExecutor {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<HttpResponse, ForgeError> {
        self.reply(RecordedRequest {
            method: "GET",
            url: url.to_owned(),
            headers: headers.to_vec(),
            query: query.to_vec(),
            body: None,
        })
    }

    fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, ForgeError> {
        self.reply(RecordedRequest {
            method: "POST",
            url: url.to_owned(),
            headers: headers.to_vec(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_reply() {
        let executor = MockExecutor::new().with_get("https://x/a", 404, "nope");
        let response = executor.get("https://x/a", &[], &[]).unwrap();
        assert_eq!(response, HttpResponse::new(404, "nope"));
    }

    #[test]
    fn test_missing_reply_is_transport_error() {
        let executor = MockExecutor::new();
        let err = executor.get("https://x/missing", &[], &[]).unwrap_err();
        assert!(matches!(err, ForgeError::Transport(msg) if msg.contains("/missing")));
    }

    #[test]
    fn test_records_requests() {
        let executor = MockExecutor::new().with_post("https://md/", 200, "<p>x</p>");
        let body = serde_json::json!({"text": "x"});
        executor
            .post_json("https://md/", &[("A".to_owned(), "b".to_owned())], &body)
            .unwrap();

        let requests = executor.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].header("a"), Some("b"));
        assert_eq!(requests[0].body, Some(body));
    }

    #[test]
    fn test_transport_failure() {
        let executor = MockExecutor::new().with_get_failure("https://x/", "connection refused");
        let err = executor.get("https://x/", &[], &[]).unwrap_err();
        assert!(matches!(err, ForgeError::Transport(_)));
    }
}

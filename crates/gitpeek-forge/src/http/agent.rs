//! Blocking transport backed by a `ureq` agent.

use std::time::Duration;

use tracing::warn;
use ureq::Agent;
use ureq::http::Response;

use super::{HttpResponse, RequestExecutor};
use crate::error::ForgeError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// [`RequestExecutor`] over a pooled `ureq` agent.
///
/// Status codes are never turned into errors (`http_status_as_error(false)`)
/// so the render layer can map them to its fixed messages.
pub struct UreqExecutor {
    agent: Agent,
    user_agent: String,
}

impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_TIMEOUT),
            concat!("gitpeek/", env!("CARGO_PKG_VERSION")),
        )
    }
}

impl UreqExecutor {
    /// Create an executor with a global per-request timeout.
    #[must_use]
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            user_agent: user_agent.into(),
        }
    }
}

impl RequestExecutor for UreqExecutor {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        query: &[(String, String)],
    ) -> Result<HttpResponse, ForgeError> {
        let mut request = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        for (name, value) in query {
            request = request.query(name, value);
        }

        read_response(request.call()?)
    }

    fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, ForgeError> {
        let mut request = self
            .agent
            .post(url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "text/html");
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        read_response(request.send_json(body)?)
    }
}

fn read_response(response: Response<ureq::Body>) -> Result<HttpResponse, ForgeError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    let body = match body_reader.read_to_string() {
        Ok(body) => body,
        Err(e) if status >= 400 => {
            warn!("Unable to read error body (HTTP {}): {}", status, e);
            String::from("(unable to read error body)")
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse { status, body })
}

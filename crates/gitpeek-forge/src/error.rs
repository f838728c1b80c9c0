//! Error types for provider operations.

/// Error from parsing a provider URL or talking to its API.
///
/// HTTP error statuses are not errors at this layer: they come back as
/// [`HttpResponse`](crate::HttpResponse) values and are classified by the
/// caller. Only failures that produce no status at all end up here.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// URL does not match the provider's expected shape.
    #[error("malformed {provider} URL '{url}': {reason}")]
    MalformedUrl {
        /// Provider display name.
        provider: &'static str,
        /// The URL as written by the author.
        url: String,
        /// What was missing or invalid.
        reason: String,
    },

    /// Provider lacks the requested capability.
    #[error("{provider} does not support {operation}")]
    Unsupported {
        /// Provider display name.
        provider: &'static str,
        /// Operation name (e.g. "notebook viewing").
        operation: &'static str,
    },

    /// Network-level failure (DNS, TLS, timeout, connection reset).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response was JSON but lacked the expected fields.
    #[error("unexpected response payload: {0}")]
    UnexpectedPayload(String),
}

impl From<ureq::Error> for ForgeError {
    fn from(err: ureq::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl ForgeError {
    pub(crate) fn malformed(
        provider: &'static str,
        url: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedUrl {
            provider,
            url: url.to_owned(),
            reason: reason.into(),
        }
    }
}

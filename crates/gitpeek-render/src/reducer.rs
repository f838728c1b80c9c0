//! Status reduction shared by every render operation.
//!
//! A provider answer is a status code plus a body. Only 200 carries a
//! payload; every other code maps to one of a fixed set of messages,
//! whatever the provider.
//!
//! | Status | Markdown | Checkout | History |
//! |--------|----------|----------|---------|
//! | 200 | body as-is | formatted date | commit lines |
//! | 404 | `404 - Not found` | `404 - Post not found on {url}` | as Markdown |
//! | 401 | `401 - Bad credentials, review token for user {user}` | `401 - Invalid credentials for user {user}` | as Markdown |
//! | 403 | `403 - Bad credentials, ...` | `500 - Server Error` | as Markdown |
//! | other | `500 - Server Error` + body | `500 - Server Error` | `500 - Server Error` |

use gitpeek_forge::{ForgeError, HttpResponse};

use crate::html::escape_html;

/// Classification of a provider status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    Success,
    NotFound,
    Unauthorized,
    Forbidden,
    /// Anything outside the table, kept for logging.
    ServerError(u16),
}

impl UpstreamStatus {
    #[must_use]
    pub fn classify(status: u16) -> Self {
        match status {
            200 => Self::Success,
            404 => Self::NotFound,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            other => Self::ServerError(other),
        }
    }

    /// Plain-text message for a non-success status, `None` on success.
    ///
    /// `user` is HTML-escaped.
    #[must_use]
    pub fn message(self, user: &str) -> Option<String> {
        match self {
            Self::Success => None,
            Self::NotFound => Some("404 - Not found".to_owned()),
            Self::Unauthorized => Some(format!(
                "401 - Bad credentials, review token for user {}",
                escape_html(user)
            )),
            Self::Forbidden => Some(format!(
                "403 - Bad credentials, review token for user {}",
                escape_html(user)
            )),
            Self::ServerError(_) => Some("500 - Server Error".to_owned()),
        }
    }
}

/// Stand-in response for a failure that produced no HTTP status.
///
/// A malformed URL reads as "not found"; everything else is a server error
/// whose body is the error text.
#[must_use]
pub fn failure_response(err: &ForgeError) -> HttpResponse {
    match err {
        ForgeError::MalformedUrl { .. } => HttpResponse::new(404, err.to_string()),
        _ => HttpResponse::new(500, err.to_string()),
    }
}

/// Markdown source for a raw-file response.
///
/// Success passes the body through untouched. Error messages become a
/// level-one heading; the generic error also echoes the body beneath it.
#[must_use]
pub fn markdown_source(response: &HttpResponse, user: &str) -> String {
    let status = UpstreamStatus::classify(response.status);
    match (status, status.message(user)) {
        (UpstreamStatus::ServerError(_), Some(message)) => {
            format!("# {message}\n\n{}", response.body)
        }
        (_, Some(message)) => format!("# {message}"),
        (_, None) => response.body.clone(),
    }
}

/// Checkout message for a non-success status.
///
/// `url` and `user` are HTML-escaped.
#[must_use]
pub fn checkout_message(status: u16, url: &str, user: &str) -> String {
    match UpstreamStatus::classify(status) {
        UpstreamStatus::NotFound => format!("404 - Post not found on {}", escape_html(url)),
        UpstreamStatus::Unauthorized => {
            format!("401 - Invalid credentials for user {}", escape_html(user))
        }
        _ => "500 - Server Error".to_owned(),
    }
}

/// History message for a non-success status.
#[must_use]
pub fn history_message(status: u16, user: &str) -> String {
    UpstreamStatus::classify(status)
        .message(user)
        .unwrap_or_else(|| "500 - Server Error".to_owned())
}

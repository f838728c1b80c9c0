//! Markdown to HTML conversion.
//!
//! The default converter posts `{"text": ...}` to a Markdown service (the
//! GitHub `/markdown` endpoint by default). A local converter backed by
//! pulldown-cmark is available for offline builds.

use gitpeek_forge::{ForgeError, RequestExecutor, basic_auth};
use pulldown_cmark::{Options, Parser, html};
use serde_json::json;
use tracing::{debug, warn};

/// Error converting Markdown.
#[derive(Debug, thiserror::Error)]
pub enum MarkdownError {
    /// The service answered with a non-2xx status.
    #[error("Markdown service returned HTTP {status}")]
    Status {
        status: u16,
        /// Service body, echoed in the error rendering.
        body: String,
    },

    /// The service could not be reached.
    #[error(transparent)]
    Transport(#[from] ForgeError),
}

impl MarkdownError {
    /// Text shown beneath the error heading.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Status { body, .. } => body.clone(),
            Self::Transport(e) => e.to_string(),
        }
    }
}

/// Markdown converter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownConverter {
    /// External service.
    Service {
        url: String,
        /// Global service credentials, independent of provider credentials.
        user: String,
        token: String,
    },
    /// In-process pulldown-cmark.
    Local,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::Service {
            url: "https://api.github.com/markdown".to_owned(),
            user: String::new(),
            token: String::new(),
        }
    }
}

impl MarkdownConverter {
    /// Convert Markdown text to HTML.
    pub fn convert(
        &self,
        executor: &dyn RequestExecutor,
        text: &str,
    ) -> Result<String, MarkdownError> {
        match self {
            Self::Service { url, user, token } => {
                let mut headers = Vec::new();
                if let Some(auth) = basic_auth(user, token) {
                    headers.push(("Authorization".to_owned(), auth));
                }

                debug!("POST {url}");
                let response = executor.post_json(url, &headers, &json!({ "text": text }))?;
                if response.is_success() {
                    Ok(response.body)
                } else {
                    warn!("Markdown service returned HTTP {}", response.status);
                    Err(MarkdownError::Status {
                        status: response.status,
                        body: response.body,
                    })
                }
            }
            Self::Local => Ok(render_local(text)),
        }
    }
}

fn render_local(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(text, options);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitpeek_forge::MockExecutor;
    use pretty_assertions::assert_eq;

    const SERVICE: &str = "https://md.example.com/markdown";

    fn service(user: &str, token: &str) -> MarkdownConverter {
        MarkdownConverter::Service {
            url: SERVICE.to_owned(),
            user: user.to_owned(),
            token: token.to_owned(),
        }
    }

    #[test]
    fn test_service_posts_text() {
        let executor = MockExecutor::new().with_post(SERVICE, 200, "<h1>Hi</h1>");
        let html = service("", "").convert(&executor, "# Hi").unwrap();

        assert_eq!(html, "<h1>Hi</h1>");
        let requests = executor.requests();
        assert_eq!(requests[0].body, Some(json!({"text": "# Hi"})));
        assert_eq!(requests[0].header("Authorization"), None);
    }

    #[test]
    fn test_service_uses_basic_auth() {
        let executor = MockExecutor::new().with_post(SERVICE, 200, "");
        service("user", "pass").convert(&executor, "x").unwrap();
        assert_eq!(
            executor.requests()[0].header("Authorization"),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn test_service_error_status() {
        let executor = MockExecutor::new().with_post(SERVICE, 403, "rate limited");
        let err = service("", "").convert(&executor, "x").unwrap_err();
        assert!(matches!(err, MarkdownError::Status { status: 403, .. }));
        assert_eq!(err.detail(), "rate limited");
    }

    #[test]
    fn test_service_unreachable() {
        let executor = MockExecutor::new();
        let err = service("", "").convert(&executor, "x").unwrap_err();
        assert!(matches!(err, MarkdownError::Transport(_)));
    }

    #[test]
    fn test_local_renderer() {
        let executor = MockExecutor::new();
        let html = MarkdownConverter::Local
            .convert(&executor, "# Title\n\n~~old~~ new")
            .unwrap();
        assert_eq!(html, "<h1>Title</h1>\n<p><del>old</del> new</p>\n");
        assert!(executor.requests().is_empty());
    }

    #[test]
    fn test_local_renderer_tables() {
        let html = render_local("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }
}

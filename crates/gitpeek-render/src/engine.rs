//! Render engine.
//!
//! Each operation parses the URL, resolves credentials, performs its
//! request(s) through the provider adapter and reduces the answer to markup.
//! Operations return a `String` in every case: failures become one of the
//! fixed messages from [`crate::reducer`].

use std::sync::Arc;

use gitpeek_forge::{
    ApiRequest, CommitRecord, CredentialOverrides, Credentials, LastCommit, Provider,
    RequestExecutor, UrlDescriptor,
};
use tracing::{info, warn};

use crate::date::format_commit_date;
use crate::html::escape_html;
use crate::notebook::extract_notebook;
use crate::reducer::{self, UpstreamStatus};
use crate::settings::RenderSettings;

/// Renders provider content through a [`RequestExecutor`].
///
/// Holds no per-call state; URL descriptors and credentials are built fresh
/// inside every operation.
pub struct RenderEngine {
    executor: Arc<dyn RequestExecutor>,
    settings: RenderSettings,
}

impl RenderEngine {
    #[must_use]
    pub fn new(executor: Arc<dyn RequestExecutor>, settings: RenderSettings) -> Self {
        Self { executor, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn credentials(&self, provider: Provider, overrides: &CredentialOverrides) -> Credentials {
        overrides.resolve(
            self.settings.defaults_for(provider),
            self.settings.history_limit,
        )
    }

    /// Fetch a file and render it as Markdown inside `<div class="gitpeek-markdown">`.
    pub fn render_markdown(
        &self,
        provider: Provider,
        url: &str,
        overrides: &CredentialOverrides,
    ) -> String {
        let adapter = provider.adapter();
        let credentials = self.credentials(provider, overrides);

        let response = adapter
            .parse_url(url)
            .and_then(|descriptor| {
                adapter
                    .raw_file_request(&descriptor, &credentials)
                    .send(self.executor.as_ref())
            })
            .unwrap_or_else(|e| {
                warn!("Unable to fetch {url}: {e}");
                reducer::failure_response(&e)
            });
        if response.status != 200 {
            info!("{provider} answered HTTP {} for {url}", response.status);
        }

        let source = reducer::markdown_source(&response, &credentials.user);
        let html = match self
            .settings
            .markdown
            .convert(self.executor.as_ref(), &source)
        {
            Ok(html) => html,
            Err(e) => {
                warn!("Markdown conversion failed for {url}: {e}");
                format!(
                    "<h1>500 - Server Error</h1>\n<pre>{}</pre>",
                    escape_html(&e.detail())
                )
            }
        };

        format!("<div class=\"gitpeek-markdown\">{html}</div>")
    }

    /// Render a notebook through the viewer inside `<div class="gitpeek-jupyter">`.
    pub fn render_notebook(&self, provider: Provider, url: &str) -> String {
        let adapter = provider.adapter();

        let page = adapter
            .parse_url(url)
            .and_then(|descriptor| {
                adapter.notebook_viewer_url(&descriptor, &self.settings.viewer_url)
            })
            .and_then(|viewer_url| ApiRequest::get(viewer_url).send(self.executor.as_ref()))
            .unwrap_or_else(|e| {
                warn!("Unable to fetch notebook {url}: {e}");
                reducer::failure_response(&e)
            });

        let content = if page.status == 200 {
            extract_notebook(&page.body).unwrap_or_else(|| {
                info!("No notebook container in viewer page for {url}");
                notebook_error(404)
            })
        } else {
            info!("Notebook viewer answered HTTP {} for {url}", page.status);
            notebook_error(page.status)
        };

        format!("<div class=\"gitpeek-jupyter\">{content}</div>")
    }

    /// Render the file's last update date with a link back to the provider.
    pub fn render_checkout_date(
        &self,
        provider: Provider,
        url: &str,
        overrides: &CredentialOverrides,
    ) -> String {
        let adapter = provider.adapter();
        let credentials = self.credentials(provider, overrides);

        let result = adapter.parse_url(url).and_then(|descriptor| {
            adapter.last_commit_date(self.executor.as_ref(), &descriptor, &credentials)
        });

        match result {
            Ok(LastCommit {
                date: Some(date), ..
            }) => format!(
                "<p class=\"gitpeek-checkout\">Last update: <strong>{}</strong><br>\n<a href=\"{}\">View on {provider}</a></p>",
                escape_html(&format_commit_date(&date)),
                escape_html(url),
            ),
            Ok(LastCommit { status, .. }) => {
                info!("{provider} answered HTTP {status} for last commit of {url}");
                checkout_fallback(status, url, &credentials.user)
            }
            Err(e) => {
                warn!("Unable to fetch last commit of {url}: {e}");
                let status = reducer::failure_response(&e).status;
                checkout_fallback(status, url, &credentials.user)
            }
        }
    }

    /// Render up to `history_limit` commits touching the file, newest first.
    pub fn render_history(
        &self,
        provider: Provider,
        url: &str,
        overrides: &CredentialOverrides,
    ) -> String {
        let adapter = provider.adapter();
        let credentials = self.credentials(provider, overrides);

        let (label, body) = match adapter.parse_url(url) {
            Ok(descriptor) => {
                let body = self.history_body(provider, &descriptor, &credentials, url);
                (descriptor.file_name().to_owned(), body)
            }
            Err(e) => {
                warn!("Unable to parse {url}: {e}");
                let status = reducer::failure_response(&e).status;
                (
                    url.to_owned(),
                    history_fallback(status, &credentials.user),
                )
            }
        };

        format!(
            "<article class=\"gitpeek-history\"><h3>Commit history of <a href=\"{}\">{}</a></h3>\n{body}</article>",
            escape_html(url),
            escape_html(&label),
        )
    }

    fn history_body(
        &self,
        provider: Provider,
        descriptor: &UrlDescriptor,
        credentials: &Credentials,
        url: &str,
    ) -> String {
        let history = match provider.adapter().commit_history(
            self.executor.as_ref(),
            descriptor,
            credentials,
        ) {
            Ok(history) => history,
            Err(e) => {
                warn!("Unable to fetch history of {url}: {e}");
                let status = reducer::failure_response(&e).status;
                return history_fallback(status, &credentials.user);
            }
        };

        if history.status != 200 {
            info!("{provider} answered HTTP {} for history of {url}", history.status);
            return history_fallback(history.status, &credentials.user);
        }

        history
            .commits
            .iter()
            .take(credentials.history_limit)
            .map(history_line)
            .collect()
    }
}

fn history_line(commit: &CommitRecord) -> String {
    format!(
        "<p><strong>{}</strong> - {} ( {} )</p>\n",
        escape_html(&format_commit_date(&commit.timestamp_raw)),
        escape_html(commit.message.trim_end()),
        escape_html(&commit.author_name),
    )
}

fn history_fallback(status: u16, user: &str) -> String {
    format!("<p>{}</p>\n", reducer::history_message(status, user))
}

fn checkout_fallback(status: u16, url: &str, user: &str) -> String {
    format!(
        "<p class=\"gitpeek-checkout\">{}</p>",
        reducer::checkout_message(status, url, user)
    )
}

fn notebook_error(status: u16) -> String {
    match UpstreamStatus::classify(status) {
        UpstreamStatus::NotFound => "<h1>404 - Not found</h1>".to_owned(),
        _ => "<h1>500 - Server Error</h1>".to_owned(),
    }
}

//! Provider adapters.
//!
//! Each supported hosting provider implements [`ProviderAdapter`]: it parses
//! the provider's web URL shape into a [`UrlDescriptor`], builds the REST
//! requests for raw content, commit history and last-commit date, and maps
//! one raw history entry to a [`CommitRecord`].
//!
//! The set of providers is closed ([`Provider`]); every variant maps to a
//! static adapter, so a missing capability is a compile error rather than a
//! runtime surprise.

mod github;
mod gitlab;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::descriptor::UrlDescriptor;
use crate::error::ForgeError;
use crate::http::{ApiRequest, RequestExecutor};

pub use github::GitHubAdapter;
pub use gitlab::GitLabAdapter;

/// Supported hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    GitHub,
    GitLab,
}

impl Provider {
    /// Every provider, in registration order.
    pub const ALL: [Self; 2] = [Self::GitHub, Self::GitLab];

    /// Lowercase key used in shortcode names and config sections.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::GitLab => "GitLab",
        }
    }

    /// The adapter implementing this provider.
    #[must_use]
    pub fn adapter(self) -> &'static dyn ProviderAdapter {
        match self {
            Self::GitHub => &GitHubAdapter,
            Self::GitLab => &GitLabAdapter,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown provider '{s}'"))
    }
}

/// One commit from a history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub author_name: String,
    /// Provider-native timestamp (RFC 3339 for both supported providers).
    pub timestamp_raw: String,
    pub message: String,
}

/// Outcome of a last-commit lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCommit {
    /// Date of the newest commit, present only when `status` is 200.
    pub date: Option<String>,
    /// Transport status, forced to 404 when the listing is empty.
    pub status: u16,
}

/// Outcome of a history lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHistory {
    pub status: u16,
    /// Commits in provider order (newest first); empty unless `status` is 200.
    pub commits: Vec<CommitRecord>,
    /// Raw body, kept for error renderings.
    pub body: String,
}

/// Provider-specific URL parsing and request construction.
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter implements.
    fn provider(&self) -> Provider;

    /// Decompose a web URL into its repository coordinates. Pure; no I/O.
    fn parse_url(&self, raw_url: &str) -> Result<UrlDescriptor, ForgeError>;

    /// Request returning the file's raw contents.
    fn raw_file_request(&self, url: &UrlDescriptor, credentials: &Credentials) -> ApiRequest;

    /// Request returning the commits touching the file, newest first.
    fn commit_history_request(&self, url: &UrlDescriptor, credentials: &Credentials)
    -> ApiRequest;

    /// Request whose first entry is the file's newest commit.
    ///
    /// Defaults to the full history request.
    fn last_commit_request(&self, url: &UrlDescriptor, credentials: &Credentials) -> ApiRequest {
        self.commit_history_request(url, credentials)
    }

    /// Map one raw history entry to `(author, date, message)`.
    ///
    /// Returns `None` when a required key is missing.
    fn extract_history_fields(&self, commit: &Value) -> Option<CommitRecord>;

    /// Directly fetchable URL of the file, if the provider exposes one.
    fn raw_file_url(&self, _url: &UrlDescriptor) -> Option<String> {
        None
    }

    /// Whether [`notebook_viewer_url`](Self::notebook_viewer_url) can succeed.
    fn supports_notebook(&self) -> bool {
        false
    }

    /// Build the nbviewer URL for the file: `{viewer}/urls/{host}/{path}`.
    fn notebook_viewer_url(
        &self,
        url: &UrlDescriptor,
        viewer_base: &str,
    ) -> Result<String, ForgeError> {
        let raw = self
            .raw_file_url(url)
            .ok_or_else(|| ForgeError::Unsupported {
                provider: self.provider().display_name(),
                operation: "notebook viewing",
            })?;
        let without_scheme = raw
            .strip_prefix("https://")
            .or_else(|| raw.strip_prefix("http://"))
            .unwrap_or(&raw);
        Ok(format!(
            "{}/urls/{without_scheme}",
            viewer_base.trim_end_matches('/')
        ))
    }

    /// Fetch the newest commit date for the file.
    ///
    /// An empty listing yields status 404 whatever the transport reported.
    fn last_commit_date(
        &self,
        executor: &dyn RequestExecutor,
        url: &UrlDescriptor,
        credentials: &Credentials,
    ) -> Result<LastCommit, ForgeError> {
        let response = self.last_commit_request(url, credentials).send(executor)?;
        let decoded = serde_json::from_str::<Value>(&response.body);

        if let Ok(json) = &decoded
            && commit_entries(json).is_some_and(<[Value]>::is_empty)
        {
            debug!("Empty commit listing for {}, treating as 404", url.file_path);
            return Ok(LastCommit {
                date: None,
                status: 404,
            });
        }

        if response.status != 200 {
            return Ok(LastCommit {
                date: None,
                status: response.status,
            });
        }

        let json = decoded?;
        let first = commit_entries(&json)
            .and_then(<[Value]>::first)
            .ok_or_else(|| ForgeError::UnexpectedPayload("expected a commit list".to_owned()))?;
        let record = self.extract_history_fields(first).ok_or_else(|| {
            ForgeError::UnexpectedPayload("commit entry without date".to_owned())
        })?;

        Ok(LastCommit {
            date: Some(record.timestamp_raw),
            status: 200,
        })
    }

    /// Fetch the file's commit history.
    ///
    /// Entries missing required keys are skipped with a warning.
    fn commit_history(
        &self,
        executor: &dyn RequestExecutor,
        url: &UrlDescriptor,
        credentials: &Credentials,
    ) -> Result<CommitHistory, ForgeError> {
        let response = self
            .commit_history_request(url, credentials)
            .send(executor)?;

        if response.status != 200 {
            return Ok(CommitHistory {
                status: response.status,
                commits: Vec::new(),
                body: response.body,
            });
        }

        let json: Value = serde_json::from_str(&response.body)?;
        let entries = commit_entries(&json)
            .ok_or_else(|| ForgeError::UnexpectedPayload("expected a commit list".to_owned()))?;

        let commits = entries
            .iter()
            .filter_map(|entry| {
                let record = self.extract_history_fields(entry);
                if record.is_none() {
                    warn!("Skipping malformed commit entry for {}", url.file_path);
                }
                record
            })
            .collect();

        Ok(CommitHistory {
            status: 200,
            commits,
            body: response.body,
        })
    }
}

/// The commit list inside a decoded response.
///
/// Accepts a bare array or a paginated object with a `values` array.
pub fn commit_entries(json: &Value) -> Option<&[Value]> {
    match json {
        Value::Array(entries) => Some(entries),
        Value::Object(map) => map.get("values")?.as_array().map(Vec::as_slice),
        _ => None,
    }
}

/// Read a string at a JSON pointer.
pub(crate) fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer)?.as_str().map(str::to_owned)
}

//! Git hosting provider adapters for gitpeek.
//!
//! This crate turns a web URL pointing at a file in a hosted repository into
//! the REST requests needed to embed it. It provides:
//!
//! - [`UrlDescriptor`]: the parsed owner, repository, branch and file path
//! - [`ProviderAdapter`] implementations for GitHub and GitLab
//! - [`RequestExecutor`], the transport seam, with [`UreqExecutor`] for real
//!   network access and `MockExecutor` for tests (behind the `mock` feature)
//! - [`Credentials`] resolution from shortcode overrides and provider defaults
//!
//! # Example
//!
//! ```ignore
//! use gitpeek_forge::{CredentialOverrides, Provider, ProviderDefaults, UreqExecutor};
//!
//! let adapter = Provider::GitHub.adapter();
//! let url = adapter.parse_url("https://github.com/owner/repo/blob/main/README.md")?;
//! let credentials = CredentialOverrides::default().resolve(&ProviderDefaults::default(), 5);
//!
//! let last = adapter.last_commit_date(&UreqExecutor::default(), &url, &credentials)?;
//! println!("{:?}", last.date);
//! ```

mod credentials;
mod descriptor;
mod error;
mod http;
mod provider;

pub use credentials::{CredentialOverrides, Credentials, ProviderDefaults, basic_auth};
pub use descriptor::{UrlDescriptor, encode_path, encode_segment};
pub use error::ForgeError;
#[cfg(feature = "mock")]
pub use http::{MockExecutor, RecordedRequest};
pub use http::{ApiRequest, Headers, HttpResponse, RequestExecutor, UreqExecutor};
pub use provider::{
    CommitHistory, CommitRecord, GitHubAdapter, GitLabAdapter, LastCommit, Provider,
    ProviderAdapter, commit_entries,
};

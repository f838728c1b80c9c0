//! GitHub adapter.
//!
//! Web URLs look like `https://github.com/{owner}/{repo}/{kind}/{branch}/{path}`
//! where `kind` is `blob`, `tree`, `raw`, ... Raw URLs
//! (`https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}`) are
//! accepted too.
//!
//! History entry keys: author under `commit.author.name`, date under
//! `commit.committer.date`, message under `commit.message`.

use serde_json::Value;

use super::{CommitRecord, Provider, ProviderAdapter, string_at};
use crate::credentials::Credentials;
use crate::descriptor::{UrlDescriptor, decoded_segments, encode_path, encode_segment, split_url};
use crate::error::ForgeError;
use crate::http::ApiRequest;

const NAME: &str = "GitHub";
const PUBLIC_HOSTS: [&str; 3] = ["github.com", "www.github.com", "raw.githubusercontent.com"];
const PUBLIC_API: &str = "https://api.github.com";
const PUBLIC_RAW_HOST: &str = "raw.githubusercontent.com";
const API_VERSION: &str = "2022-11-28";

/// Adapter for github.com and GitHub Enterprise Server.
#[derive(Debug, Clone, Copy)]
pub struct GitHubAdapter;

impl GitHubAdapter {
    /// REST API root for the descriptor's host.
    fn api_base(url: &UrlDescriptor) -> String {
        if PUBLIC_HOSTS.contains(&url.host.as_str()) {
            PUBLIC_API.to_owned()
        } else {
            format!("{}/api/v3", url.origin())
        }
    }

    fn repo_api(url: &UrlDescriptor) -> String {
        format!(
            "{}/repos/{}/{}",
            Self::api_base(url),
            encode_segment(&url.owner),
            encode_segment(url.repository.as_deref().unwrap_or_default()),
        )
    }

    fn commits_request(url: &UrlDescriptor, credentials: &Credentials) -> ApiRequest {
        ApiRequest::get(format!("{}/commits", Self::repo_api(url)))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .authorization(credentials.basic_auth_header())
            .query("path", url.file_path.as_str())
            .query("sha", url.branch.as_str())
    }
}

impl ProviderAdapter for GitHubAdapter {
    fn provider(&self) -> Provider {
        Provider::GitHub
    }

    fn parse_url(&self, raw_url: &str) -> Result<UrlDescriptor, ForgeError> {
        let split = split_url(NAME, raw_url)?;
        let segments = decoded_segments(&split.path);

        // Raw URLs have no `{kind}` segment between repo and branch.
        let (branch_idx, path_idx) = if split.host == PUBLIC_RAW_HOST {
            (2, 3)
        } else {
            (3, 4)
        };

        if segments.len() <= path_idx {
            return Err(ForgeError::malformed(
                NAME,
                raw_url,
                "expected /owner/repo/<kind>/branch/path",
            ));
        }

        Ok(UrlDescriptor {
            scheme: split.scheme,
            host: split.host,
            owner: segments[0].clone(),
            repository: Some(segments[1].clone()),
            branch: segments[branch_idx].clone(),
            file_path: segments[path_idx..].join("/"),
        })
    }

    fn raw_file_request(&self, url: &UrlDescriptor, credentials: &Credentials) -> ApiRequest {
        ApiRequest::get(format!(
            "{}/contents/{}",
            Self::repo_api(url),
            encode_path(&url.file_path)
        ))
        .header("Accept", "application/vnd.github.raw")
        .header("X-GitHub-Api-Version", API_VERSION)
        .authorization(credentials.basic_auth_header())
        .query("ref", url.branch.as_str())
    }

    fn commit_history_request(
        &self,
        url: &UrlDescriptor,
        credentials: &Credentials,
    ) -> ApiRequest {
        Self::commits_request(url, credentials)
    }

    fn last_commit_request(&self, url: &UrlDescriptor, credentials: &Credentials) -> ApiRequest {
        Self::commits_request(url, credentials).query("per_page", "1")
    }

    fn extract_history_fields(&self, commit: &Value) -> Option<CommitRecord> {
        Some(CommitRecord {
            author_name: string_at(commit, "/commit/author/name")?,
            timestamp_raw: string_at(commit, "/commit/committer/date")?,
            message: string_at(commit, "/commit/message")?,
        })
    }

    fn raw_file_url(&self, url: &UrlDescriptor) -> Option<String> {
        let repo = url.repository.as_deref()?;
        let path = encode_path(&url.file_path);
        let branch = encode_segment(&url.branch);
        if PUBLIC_HOSTS.contains(&url.host.as_str()) {
            Some(format!(
                "https://{PUBLIC_RAW_HOST}/{}/{repo}/{branch}/{path}",
                url.owner
            ))
        } else {
            Some(format!(
                "{}/{}/{repo}/raw/{branch}/{path}",
                url.origin(),
                url.owner
            ))
        }
    }

    fn supports_notebook(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn creds(user: &str, token: &str) -> Credentials {
        Credentials {
            user: user.to_owned(),
            token: token.to_owned(),
            history_limit: 5,
        }
    }

    fn parse(url: &str) -> UrlDescriptor {
        GitHubAdapter.parse_url(url).unwrap()
    }

    #[test]
    fn test_parse_tree_url() {
        let d = parse("https://github.com/owner/repo/tree/branch/a/b/c");
        assert_eq!(d.owner, "owner");
        assert_eq!(d.repository.as_deref(), Some("repo"));
        assert_eq!(d.branch, "branch");
        assert_eq!(d.file_path, "a/b/c");
        assert_eq!(d.host, "github.com");
    }

    #[test]
    fn test_parse_blob_url_single_file() {
        let d = parse("https://github.com/acme/docs/blob/main/README.md");
        assert_eq!(d.branch, "main");
        assert_eq!(d.file_path, "README.md");
    }

    #[test]
    fn test_parse_raw_host_url() {
        let d = parse("https://raw.githubusercontent.com/acme/docs/v1.0/guide/intro.md");
        assert_eq!(d.owner, "acme");
        assert_eq!(d.repository.as_deref(), Some("docs"));
        assert_eq!(d.branch, "v1.0");
        assert_eq!(d.file_path, "guide/intro.md");
    }

    #[test]
    fn test_parse_decodes_path() {
        let d = parse("https://github.com/acme/docs/blob/main/my%20notes.md");
        assert_eq!(d.file_path, "my notes.md");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let url = "https://github.com/owner/repo/blob/main/docs/index.md";
        assert_eq!(parse(url), parse(url));
    }

    #[test]
    fn test_parse_missing_file_path() {
        let err = GitHubAdapter
            .parse_url("https://github.com/owner/repo/tree/main")
            .unwrap_err();
        assert!(matches!(err, ForgeError::MalformedUrl { provider: "GitHub", .. }));
    }

    #[test]
    fn test_parse_repo_root() {
        assert!(GitHubAdapter.parse_url("https://github.com/owner/repo").is_err());
    }

    #[test]
    fn test_raw_file_request() {
        let d = parse("https://github.com/acme/docs/blob/main/guide/my notes.md");
        let request = GitHubAdapter.raw_file_request(&d, &creds("user", "pass"));

        assert_eq!(
            request.url,
            "https://api.github.com/repos/acme/docs/contents/guide/my%20notes.md"
        );
        assert_eq!(request.query_value("ref"), Some("main"));
        assert_eq!(request.header_value("Accept"), Some("application/vnd.github.raw"));
        assert_eq!(
            request.header_value("Authorization"),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn test_anonymous_request_has_no_authorization() {
        let d = parse("https://github.com/acme/docs/blob/main/README.md");
        let request = GitHubAdapter.raw_file_request(&d, &creds("", ""));
        assert_eq!(request.header_value("Authorization"), None);
    }

    #[test]
    fn test_history_request() {
        let d = parse("https://github.com/acme/docs/blob/dev/a/b.md");
        let request = GitHubAdapter.commit_history_request(&d, &creds("u", "t"));

        assert_eq!(request.url, "https://api.github.com/repos/acme/docs/commits");
        assert_eq!(request.query_value("path"), Some("a/b.md"));
        assert_eq!(request.query_value("sha"), Some("dev"));
        assert_eq!(request.query_value("per_page"), None);
    }

    #[test]
    fn test_last_commit_request_limits_page() {
        let d = parse("https://github.com/acme/docs/blob/dev/a/b.md");
        let request = GitHubAdapter.last_commit_request(&d, &creds("u", "t"));
        assert_eq!(request.url, "https://api.github.com/repos/acme/docs/commits");
        assert_eq!(request.query_value("per_page"), Some("1"));
    }

    #[test]
    fn test_enterprise_api_base() {
        let d = parse("https://git.corp.example/team/app/blob/main/README.md");
        let request = GitHubAdapter.raw_file_request(&d, &creds("u", "t"));
        assert_eq!(
            request.url,
            "https://git.corp.example/api/v3/repos/team/app/contents/README.md"
        );
    }

    #[test]
    fn test_extract_history_fields() {
        let entry = json!({
            "sha": "abc",
            "commit": {
                "author": {"name": "Mona", "date": "2021-02-28T09:00:00Z"},
                "committer": {"name": "GitHub", "date": "2021-03-01T10:00:00Z"},
                "message": "Fix typo"
            }
        });
        let record = GitHubAdapter.extract_history_fields(&entry).unwrap();
        assert_eq!(
            record,
            CommitRecord {
                author_name: "Mona".to_owned(),
                timestamp_raw: "2021-03-01T10:00:00Z".to_owned(),
                message: "Fix typo".to_owned(),
            }
        );
    }

    #[test]
    fn test_extract_history_fields_missing_key() {
        let entry = json!({"commit": {"message": "no author"}});
        assert!(GitHubAdapter.extract_history_fields(&entry).is_none());
    }

    #[test]
    fn test_notebook_viewer_url() {
        let d = parse("https://github.com/acme/nb/blob/main/analysis/run.ipynb");
        let viewer = GitHubAdapter
            .notebook_viewer_url(&d, "https://nbviewer.jupyter.org/")
            .unwrap();
        assert_eq!(
            viewer,
            "https://nbviewer.jupyter.org/urls/raw.githubusercontent.com/acme/nb/main/analysis/run.ipynb"
        );
    }
}

//! GitLab adapter.
//!
//! Web URLs look like `https://gitlab.com/{namespace...}/-/{kind}/{branch}/{path}`.
//! Everything before `/-/` is the project path; it is percent-encoded into
//! the `owner` field because the v4 API takes it as a single path segment.
//!
//! History entry keys: author under `author_name`, date under
//! `committed_date`, message under `message`.

use serde_json::Value;

use super::{CommitRecord, Provider, ProviderAdapter, string_at};
use crate::credentials::Credentials;
use crate::descriptor::{UrlDescriptor, decode, decoded_segments, encode_segment, split_url};
use crate::error::ForgeError;
use crate::http::ApiRequest;

const NAME: &str = "GitLab";
const SEPARATOR: &str = "/-/";

/// Adapter for gitlab.com and self-managed GitLab instances.
#[derive(Debug, Clone, Copy)]
pub struct GitLabAdapter;

impl GitLabAdapter {
    fn project_api(url: &UrlDescriptor) -> String {
        format!("{}/api/v4/projects/{}", url.origin(), url.owner)
    }
}

impl ProviderAdapter for GitLabAdapter {
    fn provider(&self) -> Provider {
        Provider::GitLab
    }

    fn parse_url(&self, raw_url: &str) -> Result<UrlDescriptor, ForgeError> {
        let split = split_url(NAME, raw_url)?;

        let (head, tail) = split
            .path
            .split_once(SEPARATOR)
            .ok_or_else(|| ForgeError::malformed(NAME, raw_url, "missing '/-/' separator"))?;

        let namespace = decode(head.trim_start_matches('/'));
        if namespace.is_empty() {
            return Err(ForgeError::malformed(NAME, raw_url, "missing project path"));
        }

        let segments = decoded_segments(tail);
        if segments.len() < 3 {
            return Err(ForgeError::malformed(
                NAME,
                raw_url,
                "expected /-/<kind>/branch/path after the project path",
            ));
        }

        Ok(UrlDescriptor {
            scheme: split.scheme,
            host: split.host,
            owner: encode_segment(&namespace),
            repository: None,
            branch: segments[1].clone(),
            file_path: segments[2..].join("/"),
        })
    }

    fn raw_file_request(&self, url: &UrlDescriptor, credentials: &Credentials) -> ApiRequest {
        ApiRequest::get(format!(
            "{}/repository/files/{}/raw",
            Self::project_api(url),
            encode_segment(&url.file_path)
        ))
        .authorization(credentials.bearer_auth_header())
        .query("ref", url.branch.as_str())
    }

    fn commit_history_request(
        &self,
        url: &UrlDescriptor,
        credentials: &Credentials,
    ) -> ApiRequest {
        ApiRequest::get(format!("{}/repository/commits", Self::project_api(url)))
            .header("Accept", "application/json")
            .authorization(credentials.bearer_auth_header())
            .query("path", url.file_path.as_str())
            .query("ref_name", url.branch.as_str())
    }

    fn extract_history_fields(&self, commit: &Value) -> Option<CommitRecord> {
        Some(CommitRecord {
            author_name: string_at(commit, "/author_name")?,
            timestamp_raw: string_at(commit, "/committed_date")?,
            message: string_at(commit, "/message")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn creds(token: &str) -> Credentials {
        Credentials {
            user: "tanuki".to_owned(),
            token: token.to_owned(),
            history_limit: 5,
        }
    }

    fn parse(url: &str) -> UrlDescriptor {
        GitLabAdapter.parse_url(url).unwrap()
    }

    #[test]
    fn test_parse_simple_url() {
        let d = parse("https://gitlab.com/owner/-/blob/branch/a/b");
        assert_eq!(d.owner, "owner");
        assert_eq!(d.repository, None);
        assert_eq!(d.branch, "branch");
        assert_eq!(d.file_path, "a/b");
    }

    #[test]
    fn test_parse_encodes_namespace() {
        let d = parse("https://gitlab.com/group/sub group/project/-/blob/main/docs/x.md");
        assert_eq!(d.owner, "group%2Fsub%20group%2Fproject");
        assert_eq!(d.branch, "main");
        assert_eq!(d.file_path, "docs/x.md");
    }

    #[test]
    fn test_parse_self_hosted_with_port() {
        let d = parse("https://git.example.com:8443/team/app/-/raw/release/README.md");
        assert_eq!(d.host, "git.example.com:8443");
        assert_eq!(d.owner, "team%2Fapp");
        assert_eq!(d.branch, "release");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let url = "https://gitlab.com/g/p/-/blob/main/a.md";
        assert_eq!(parse(url), parse(url));
    }

    #[test]
    fn test_parse_without_separator() {
        let err = GitLabAdapter
            .parse_url("https://gitlab.com/group/project/blob/main/a.md")
            .unwrap_err();
        assert!(matches!(err, ForgeError::MalformedUrl { provider: "GitLab", .. }));
    }

    #[test]
    fn test_parse_missing_file_path() {
        assert!(
            GitLabAdapter
                .parse_url("https://gitlab.com/group/project/-/blob/main")
                .is_err()
        );
    }

    #[test]
    fn test_parse_missing_namespace() {
        assert!(
            GitLabAdapter
                .parse_url("https://gitlab.com/-/blob/main/a.md")
                .is_err()
        );
    }

    #[test]
    fn test_raw_file_request() {
        let d = parse("https://gitlab.com/group/project/-/blob/main/docs/guide.md");
        let request = GitLabAdapter.raw_file_request(&d, &creds("glpat-x"));

        assert_eq!(
            request.url,
            "https://gitlab.com/api/v4/projects/group%2Fproject/repository/files/docs%2Fguide.md/raw"
        );
        assert_eq!(request.query_value("ref"), Some("main"));
        assert_eq!(request.header_value("Authorization"), Some("Bearer glpat-x"));
    }

    #[test]
    fn test_history_request() {
        let d = parse("https://gitlab.com/group/project/-/blob/dev/docs/guide.md");
        let request = GitLabAdapter.commit_history_request(&d, &creds(""));

        assert_eq!(
            request.url,
            "https://gitlab.com/api/v4/projects/group%2Fproject/repository/commits"
        );
        assert_eq!(request.query_value("path"), Some("docs/guide.md"));
        assert_eq!(request.query_value("ref_name"), Some("dev"));
        assert_eq!(request.header_value("Authorization"), None);
    }

    #[test]
    fn test_last_commit_reuses_history_request() {
        let d = parse("https://gitlab.com/group/project/-/blob/dev/docs/guide.md");
        assert_eq!(
            GitLabAdapter.last_commit_request(&d, &creds("t")),
            GitLabAdapter.commit_history_request(&d, &creds("t"))
        );
    }

    #[test]
    fn test_extract_history_fields() {
        let entry = json!({
            "id": "ed899a2f",
            "author_name": "Tanuki",
            "committed_date": "2021-03-01T10:00:00.000+00:00",
            "message": "Update guide\n"
        });
        let record = GitLabAdapter.extract_history_fields(&entry).unwrap();
        assert_eq!(record.author_name, "Tanuki");
        assert_eq!(record.timestamp_raw, "2021-03-01T10:00:00.000+00:00");
        assert_eq!(record.message, "Update guide\n");
    }

    #[test]
    fn test_notebook_unsupported() {
        let d = parse("https://gitlab.com/group/project/-/blob/main/nb.ipynb");
        let err = GitLabAdapter
            .notebook_viewer_url(&d, "https://nbviewer.jupyter.org")
            .unwrap_err();
        assert!(matches!(err, ForgeError::Unsupported { provider: "GitLab", .. }));
    }
}

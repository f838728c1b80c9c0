//! Parsed decomposition of a provider web URL.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::error::ForgeError;

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
///
/// Everything else, `/` included, is escaped so a value can be embedded
/// as a single path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A file in a hosted repository, as addressed by a web URL.
///
/// Built fresh for every render call and never mutated afterwards.
///
/// `owner` is provider-encoded: GitLab stores the percent-escaped namespace
/// path (`group%2Fproject`) because it is embedded verbatim in API paths.
/// `file_path` is decoded and never starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlDescriptor {
    /// URL scheme (`https` in practice).
    pub scheme: String,
    /// Host, including the port when one was given.
    pub host: String,
    /// Owner or namespace.
    pub owner: String,
    /// Repository name, absent when the owner already names the project.
    pub repository: Option<String>,
    /// Branch, tag or commit.
    pub branch: String,
    /// Path of the file inside the repository.
    pub file_path: String,
}

impl UrlDescriptor {
    /// `scheme://host` of the original URL.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Last component of the file path, for display.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.file_path)
    }
}

/// Pieces of a URL shared by every provider's parser.
#[derive(Debug)]
pub(crate) struct SplitUrl {
    pub scheme: String,
    pub host: String,
    /// Path as written, still percent-encoded.
    pub path: String,
}

/// Parse `raw` and split off scheme, host and path.
pub(crate) fn split_url(provider: &'static str, raw: &str) -> Result<SplitUrl, ForgeError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| ForgeError::malformed(provider, raw, e.to_string()))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| ForgeError::malformed(provider, raw, "missing host"))?;
    let host = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };

    Ok(SplitUrl {
        scheme: parsed.scheme().to_owned(),
        host,
        path: parsed.path().to_owned(),
    })
}

/// Split an encoded path into decoded, non-empty segments.
pub(crate) fn decoded_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(decode)
        .collect()
}

/// Percent-decode a single path component.
pub(crate) fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Percent-encode a value as one path segment (`/` becomes `%2F`).
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT_ENCODE_SET).to_string()
}

/// Percent-encode each component of a `/`-separated path, keeping the slashes.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

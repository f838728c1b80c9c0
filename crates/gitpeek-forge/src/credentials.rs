//! Per-call credentials and their resolution from shortcode overrides.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Effective credentials for a single render call.
///
/// Resolved once per call and passed by reference down the call chain;
/// never stored on an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub user: String,
    /// Access token. Empty means anonymous.
    pub token: String,
    /// Maximum number of history entries to render.
    pub history_limit: usize,
}

impl Credentials {
    /// `Authorization: Basic base64(user:token)`, or `None` without a token.
    #[must_use]
    pub fn basic_auth_header(&self) -> Option<String> {
        basic_auth(&self.user, &self.token)
    }

    /// `Authorization: Bearer token`, or `None` without a token.
    #[must_use]
    pub fn bearer_auth_header(&self) -> Option<String> {
        if self.token.is_empty() {
            return None;
        }
        Some(format!("Bearer {}", self.token))
    }
}

/// Build a Basic auth header value, or `None` when the token is empty.
#[must_use]
pub fn basic_auth(user: &str, token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let encoded = BASE64_STANDARD.encode(format!("{user}:{token}"));
    Some(format!("Basic {encoded}"))
}

/// Provider-level default credentials.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProviderDefaults {
    pub user: String,
    pub token: String,
}

/// Shortcode-level values that take precedence over provider defaults.
///
/// Empty strings count as absent, matching how shortcode attributes that
/// were written but left blank are delivered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CredentialOverrides {
    pub user: Option<String>,
    pub token: Option<String>,
    pub limit: Option<usize>,
}

impl CredentialOverrides {
    /// Resolve effective credentials against provider defaults.
    #[must_use]
    pub fn resolve(&self, defaults: &ProviderDefaults, default_limit: usize) -> Credentials {
        Credentials {
            user: pick(self.user.as_deref(), &defaults.user),
            token: pick(self.token.as_deref(), &defaults.token),
            history_limit: self.limit.unwrap_or(default_limit),
        }
    }
}

fn pick(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => fallback.to_owned(),
    }
}

//! Shortcode argument parsing.
//!
//! Arguments come from the `[url]{key=value ...}` part of a shortcode.

use std::collections::HashMap;

use gitpeek_forge::CredentialOverrides;
use tracing::warn;

/// Parsed `[content]{attrs}` of a shortcode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShortcodeArgs {
    /// Bracket content (empty when absent).
    pub content: String,
    /// `key=value` attributes. Values may be single or double quoted.
    pub attrs: HashMap<String, String>,
}

impl ShortcodeArgs {
    /// Parse bracket content and the attribute string (without braces).
    #[must_use]
    pub fn parse(content: &str, attrs_str: &str) -> Self {
        let mut attrs = HashMap::new();
        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            if let Some((key, value, rest)) = split_key_value(remaining) {
                attrs.insert(key.to_owned(), value.to_owned());
                remaining = rest.trim_start();
            } else {
                // No `=` left: drop the stray word.
                let skip = remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len());
                remaining = remaining[skip..].trim_start();
            }
        }

        Self {
            content: content.trim().to_owned(),
            attrs,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Target URL: bracket content, or the `url` attribute.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        if self.content.is_empty() {
            self.get("url").filter(|u| !u.is_empty())
        } else {
            Some(&self.content)
        }
    }

    /// Credential overrides from `user`, `token` and `limit`.
    ///
    /// A `limit` that is not a non-negative integer is ignored.
    #[must_use]
    pub fn overrides(&self) -> CredentialOverrides {
        let limit = self.get("limit").and_then(|raw| match raw.parse() {
            Ok(limit) => Some(limit),
            Err(_) => {
                warn!("Ignoring invalid history limit '{raw}'");
                None
            }
        });

        CredentialOverrides {
            user: self.get("user").map(str::to_owned),
            token: self.get("token").map(str::to_owned),
            limit,
        }
    }
}

/// Split `key=value rest`, `key="value" rest` or `key='value' rest`.
fn split_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq = s.find('=')?;
    let key = s[..eq].trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after = &s[eq + 1..];
    for quote in ['"', '\''] {
        if let Some(quoted) = after.strip_prefix(quote) {
            let end = quoted.find(quote)?;
            return Some((key, &quoted[..end], &quoted[end + 1..]));
        }
    }

    let end = after.find(char::is_whitespace).unwrap_or(after.len());
    Some((key, &after[..end], &after[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_is_url() {
        let args = ShortcodeArgs::parse(" https://github.com/o/r/blob/main/a.md ", "");
        assert_eq!(args.url(), Some("https://github.com/o/r/blob/main/a.md"));
    }

    #[test]
    fn test_url_attribute() {
        let args = ShortcodeArgs::parse("", r#"url="https://gitlab.com/g/p/-/blob/main/a.md""#);
        assert_eq!(args.url(), Some("https://gitlab.com/g/p/-/blob/main/a.md"));
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(ShortcodeArgs::parse("", "user=alice").url(), None);
        assert_eq!(ShortcodeArgs::parse("", "url=").url(), None);
    }

    #[test]
    fn test_quoting_styles() {
        let args = ShortcodeArgs::parse("", r#"user="Jane Doe" token='a b' limit=3"#);
        assert_eq!(args.get("user"), Some("Jane Doe"));
        assert_eq!(args.get("token"), Some("a b"));
        assert_eq!(args.get("limit"), Some("3"));
    }

    #[test]
    fn test_stray_words_ignored() {
        let args = ShortcodeArgs::parse("", "lonely user=bob");
        assert_eq!(args.attrs.len(), 1);
        assert_eq!(args.get("user"), Some("bob"));
    }

    #[test]
    fn test_overrides() {
        let args = ShortcodeArgs::parse("u", "user=alice token=t limit=2");
        assert_eq!(
            args.overrides(),
            CredentialOverrides {
                user: Some("alice".to_owned()),
                token: Some("t".to_owned()),
                limit: Some(2),
            }
        );
    }

    #[test]
    fn test_invalid_limit_ignored() {
        let args = ShortcodeArgs::parse("u", "limit=-1");
        assert_eq!(args.overrides().limit, None);
    }
}

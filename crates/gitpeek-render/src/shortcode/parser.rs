//! Shortcode syntax: `::name[url]{key=value ...}`.

use super::ShortcodeArgs;

/// A shortcode found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShortcodeMatch {
    pub name: String,
    pub args: ShortcodeArgs,
    /// Byte offset of the leading `::`.
    pub start: usize,
    /// Byte offset just past the closing `]` or `}`.
    pub end: usize,
}

/// Find every shortcode in a line, left to right.
///
/// A shortcode is exactly two colons, a name of ASCII alphanumerics, `-`
/// or `_`, and at least one of `[...]` or `{...}`. Longer colon runs and
/// bare `::name` (as in `std::fmt`) are not shortcodes.
pub(crate) fn find_shortcodes(line: &str) -> Vec<ShortcodeMatch> {
    let mut found = Vec::new();
    let mut search = 0;

    while let Some(offset) = line[search..].find("::") {
        let start = search + offset;
        let colons = line[start..].bytes().take_while(|&b| b == b':').count();
        if colons != 2 {
            search = start + colons;
            continue;
        }

        match parse_at(line, start) {
            Some(shortcode) => {
                search = shortcode.end;
                found.push(shortcode);
            }
            None => search = start + colons,
        }
    }

    found
}

fn parse_at(line: &str, start: usize) -> Option<ShortcodeMatch> {
    let name_start = start + 2;
    let after = &line[name_start..];
    let name_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after.len());
    if name_len == 0 {
        return None;
    }

    let mut pos = name_start + name_len;
    let content = enclosed(&line[pos..], '[', ']');
    if let Some((_, consumed)) = content {
        pos += consumed;
    }
    let attrs = enclosed(&line[pos..], '{', '}');
    if let Some((_, consumed)) = attrs {
        pos += consumed;
    }

    if content.is_none() && attrs.is_none() {
        return None;
    }

    Some(ShortcodeMatch {
        name: after[..name_len].to_owned(),
        args: ShortcodeArgs::parse(
            content.map_or("", |(c, _)| c),
            attrs.map_or("", |(a, _)| a),
        ),
        start,
        end: pos,
    })
}

/// Inner text and consumed length of a balanced `open ... close` prefix.
fn enclosed(s: &str, open: char, close: char) -> Option<(&str, usize)> {
    if !s.starts_with(open) {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some((&s[1..i], i + 1));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_shortcode() {
        let line = "::github-history[https://github.com/o/r/blob/main/a.md]{limit=3 user=\"bob\"}";
        let found = find_shortcodes(line);

        assert_eq!(found.len(), 1);
        let shortcode = &found[0];
        assert_eq!(shortcode.name, "github-history");
        assert_eq!(shortcode.args.url(), Some("https://github.com/o/r/blob/main/a.md"));
        assert_eq!(shortcode.args.get("limit"), Some("3"));
        assert_eq!(shortcode.args.get("user"), Some("bob"));
        assert_eq!((shortcode.start, shortcode.end), (0, line.len()));
    }

    #[test]
    fn test_attrs_only() {
        let found = find_shortcodes("::gitlab-checkout{url=https://gitlab.com/g/p/-/blob/main/a}");
        assert_eq!(found[0].name, "gitlab-checkout");
        assert_eq!(found[0].args.url(), Some("https://gitlab.com/g/p/-/blob/main/a"));
    }

    #[test]
    fn test_inline_position() {
        let line = "Updated: ::github-checkout[https://github.com/o/r/blob/main/a] (UTC)";
        let found = find_shortcodes(line);
        assert_eq!(found.len(), 1);
        assert_eq!(&line[found[0].start..found[0].end], "::github-checkout[https://github.com/o/r/blob/main/a]");
    }

    #[test]
    fn test_multiple_per_line() {
        let found = find_shortcodes("::a[x] and ::b{k=v}");
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_not_shortcodes() {
        assert!(find_shortcodes("use std::fmt;").is_empty());
        assert!(find_shortcodes(":::note[x]").is_empty());
        assert!(find_shortcodes(":single[x]").is_empty());
        assert!(find_shortcodes(":: [x]").is_empty());
        assert!(find_shortcodes("::open[unterminated").is_empty());
    }
}

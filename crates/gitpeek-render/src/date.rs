//! Commit timestamp formatting.

use chrono::{DateTime, Utc};

/// Display format for commit dates: `dd/mm/yyyy HH:mm:ss`.
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Format a provider timestamp for display, in UTC.
///
/// Both providers send RFC 3339. Anything else is returned verbatim so an
/// unexpected format still shows up in the page.
#[must_use]
pub fn format_commit_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => parsed
            .with_timezone(&Utc)
            .format(DISPLAY_FORMAT)
            .to_string(),
        Err(_) => raw.to_owned(),
    }
}

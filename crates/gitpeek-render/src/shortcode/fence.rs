//! Code fence tracking.
//!
//! Shortcodes inside fenced code blocks are documentation, not directives,
//! and must be left alone.

/// Tracks whether line-by-line processing is inside a fenced code block.
///
/// A fence opens with three or more backticks or tildes and closes with a
/// line of the same character that is at least as long.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` when the line opens or closes a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let Some((ch, len)) = fence_marker(trimmed) else {
            return false;
        };

        match self.open {
            None => {
                self.open = Some((ch, len));
                true
            }
            Some((open_ch, open_len)) => {
                let closes = ch == open_ch
                    && len >= open_len
                    && trimmed[len..].chars().all(char::is_whitespace);
                if closes {
                    self.open = None;
                }
                closes
            }
        }
    }
}

/// Fence character and run length at the start of `trimmed`, if it is a fence.
fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}

//! Shortcode registration and document expansion.
//!
//! Shortcodes are named `{provider}-{action}`, e.g. `github-markdown` or
//! `gitlab-history`, and written as leaf directives:
//!
//! ```text
//! ::github-history[https://github.com/owner/repo/blob/main/README.md]{limit=3}
//! ::gitlab-checkout[https://gitlab.com/group/project/-/blob/main/docs/index.md]{user=alice token="${TOKEN}"}
//! ```
//!
//! [`ShortcodeRegistry::with_defaults`] enumerates every provider and action
//! once at startup. Actions a provider cannot serve are never registered, so
//! an unsupported combination is rejected when the registry is built rather
//! than on first use.

mod args;
mod fence;
mod parser;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use gitpeek_forge::{CredentialOverrides, Provider};
use tracing::{debug, warn};

use crate::engine::RenderEngine;
use crate::html::escape_html;

pub use args::ShortcodeArgs;
use fence::FenceTracker;
use parser::find_shortcodes;

/// What a shortcode renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// File content rendered as Markdown.
    Markdown,
    /// Jupyter notebook rendered through the viewer.
    Jupyter,
    /// Last update date.
    Checkout,
    /// Recent commit history.
    History,
}

impl Action {
    pub const ALL: [Self; 4] = [Self::Markdown, Self::Jupyter, Self::Checkout, Self::History];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Jupyter => "jupyter",
            Self::Checkout => "checkout",
            Self::History => "history",
        }
    }

    /// Whether `provider` can serve this action.
    #[must_use]
    pub fn supported_by(self, provider: Provider) -> bool {
        match self {
            Self::Jupyter => provider.adapter().supports_notebook(),
            Self::Markdown | Self::Checkout | Self::History => true,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

/// A registered shortcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub provider: Provider,
    pub action: Action,
}

impl Binding {
    /// Run the bound engine operation.
    ///
    /// Notebook rendering ignores `overrides`.
    #[must_use]
    pub fn render(
        self,
        engine: &RenderEngine,
        url: &str,
        overrides: &CredentialOverrides,
    ) -> String {
        match self.action {
            Action::Markdown => engine.render_markdown(self.provider, url, overrides),
            Action::Jupyter => engine.render_notebook(self.provider, url),
            Action::Checkout => engine.render_checkout_date(self.provider, url, overrides),
            Action::History => engine.render_history(self.provider, url, overrides),
        }
    }
}

/// Error registering a shortcode.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{provider} does not support the '{action}' action")]
    Unsupported { provider: Provider, action: Action },

    #[error("shortcode '{0}' is already registered")]
    Duplicate(String),
}

/// Shortcode name to (provider, action) table.
#[derive(Debug, Default)]
pub struct ShortcodeRegistry {
    bindings: BTreeMap<String, Binding>,
}

impl ShortcodeRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every supported `{provider}-{action}` pair.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for provider in Provider::ALL {
            for action in Action::ALL {
                match registry.register(provider, action) {
                    Ok(()) | Err(RegistryError::Unsupported { .. }) => {}
                    Err(e) => warn!("{e}"),
                }
            }
        }
        registry
    }

    /// Bind `{provider}-{action}`.
    pub fn register(&mut self, provider: Provider, action: Action) -> Result<(), RegistryError> {
        if !action.supported_by(provider) {
            return Err(RegistryError::Unsupported { provider, action });
        }

        let name = format!("{}-{}", provider.key(), action.key());
        if self.bindings.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!("Registered shortcode {name}");
        self.bindings.insert(name, Binding { provider, action });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Render one shortcode. Returns `None` for unknown names.
    #[must_use]
    pub fn render(
        &self,
        engine: &RenderEngine,
        name: &str,
        args: &ShortcodeArgs,
    ) -> Option<String> {
        let binding = self.get(name)?;
        let Some(url) = args.url() else {
            warn!("Shortcode {name} has no URL");
            return Some(format!(
                "<p>404 - Not found: {} needs a URL</p>",
                escape_html(name)
            ));
        };
        Some(binding.render(engine, url, &args.overrides()))
    }

    /// Replace every registered shortcode in a document with its rendering.
    ///
    /// Fenced code blocks are copied unchanged, as are shortcodes with
    /// unregistered names.
    #[must_use]
    pub fn expand(&self, engine: &RenderEngine, document: &str) -> String {
        let mut out = String::with_capacity(document.len());
        let mut fence = FenceTracker::default();

        for line in document.split_inclusive('\n') {
            if fence.update(line) || fence.in_fence() {
                out.push_str(line);
                continue;
            }

            let mut last = 0;
            for shortcode in find_shortcodes(line) {
                if let Some(html) = self.render(engine, &shortcode.name, &shortcode.args) {
                    out.push_str(&line[last..shortcode.start]);
                    out.push_str(&html);
                    last = shortcode.end;
                }
            }
            out.push_str(&line[last..]);
        }

        out
    }
}

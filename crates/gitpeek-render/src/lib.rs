//! Rendering of git-hosted content for gitpeek.
//!
//! [`RenderEngine`] exposes the four render operations:
//!
//! - [`render_markdown`](RenderEngine::render_markdown): a file converted to HTML
//! - [`render_notebook`](RenderEngine::render_notebook): a Jupyter notebook via nbviewer
//! - [`render_checkout_date`](RenderEngine::render_checkout_date): last update date
//! - [`render_history`](RenderEngine::render_history): recent commits
//!
//! Every operation returns markup, including on failure. Provider statuses
//! and transport errors are reduced to fixed messages ([`reducer`]).
//!
//! [`ShortcodeRegistry`] binds `{provider}-{action}` shortcode names to those
//! operations and expands them inside Markdown documents.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use gitpeek_forge::{CredentialOverrides, Provider, UreqExecutor};
//! use gitpeek_render::{RenderEngine, RenderSettings};
//!
//! let engine = RenderEngine::new(Arc::new(UreqExecutor::default()), RenderSettings::default());
//! let html = engine.render_history(
//!     Provider::GitHub,
//!     "https://github.com/owner/repo/blob/main/README.md",
//!     &CredentialOverrides::default(),
//! );
//! ```

mod date;
mod engine;
mod html;
mod markdown;
mod notebook;
pub mod reducer;
mod settings;
mod shortcode;

pub use date::format_commit_date;
pub use engine::RenderEngine;
pub use html::escape_html;
pub use markdown::{MarkdownConverter, MarkdownError};
pub use notebook::extract_notebook;
pub use settings::RenderSettings;
pub use shortcode::{Action, Binding, RegistryError, ShortcodeArgs, ShortcodeRegistry};

//! CLI command implementations.

mod expand;
mod render;
pub(crate) mod shortcodes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use gitpeek_config::{CliSettings, Config, MarkdownRenderer};
use gitpeek_forge::UreqExecutor;
use gitpeek_render::{RenderEngine, RenderSettings};

use crate::error::CliError;

pub(crate) use expand::ExpandArgs;
pub(crate) use render::RenderArgs;

/// Options shared by commands that talk to providers.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover gitpeek.toml).
    #[arg(short, long, env = "GITPEEK_CONFIG")]
    config: Option<PathBuf>,

    /// Convert Markdown locally instead of calling the Markdown service.
    #[arg(long)]
    local_markdown: bool,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CommonArgs {
    fn cli_settings(&self, history_limit: Option<usize>) -> CliSettings {
        CliSettings {
            history_limit,
            markdown_renderer: self.local_markdown.then_some(MarkdownRenderer::Local),
            timeout_secs: self.timeout,
        }
    }

    /// Load configuration and build a render engine over the network transport.
    fn engine(&self, history_limit: Option<usize>, version: &str) -> Result<RenderEngine, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings(history_limit)))?;
        Ok(build_engine(&config, version))
    }
}

fn build_engine(config: &Config, version: &str) -> RenderEngine {
    let user_agent = config
        .http
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("gitpeek/{version}"));
    let executor = UreqExecutor::new(Duration::from_secs(config.http.timeout_secs), user_agent);

    RenderEngine::new(Arc::new(executor), RenderSettings::from_config(config))
}

//! `gitpeek render` command implementation.

use clap::Args;
use gitpeek_forge::CredentialOverrides;
use gitpeek_render::ShortcodeRegistry;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Shortcode name, e.g. `github-markdown` (see `gitpeek shortcodes`).
    shortcode: String,

    /// Web URL of the file.
    url: String,

    /// User for provider authentication (overrides config).
    #[arg(short, long)]
    user: Option<String>,

    /// Token for provider authentication (overrides config).
    #[arg(short, long)]
    token: Option<String>,

    /// Number of commits shown by history shortcodes.
    #[arg(short, long)]
    limit: Option<usize>,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the shortcode is unknown or configuration fails to load.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let registry = ShortcodeRegistry::with_defaults();
        let binding = registry.get(&self.shortcode).ok_or_else(|| {
            CliError::Validation(format!(
                "unknown shortcode '{}' (run `gitpeek shortcodes` for the list)",
                self.shortcode
            ))
        })?;

        let engine = self.common.engine(None, version)?;
        let overrides = CredentialOverrides {
            user: self.user,
            token: self.token,
            limit: self.limit,
        };

        let html = binding.render(&engine, &self.url, &overrides);
        Output::new().result(&html)?;
        Ok(())
    }
}

//! `gitpeek expand` command implementation.

use std::path::PathBuf;

use clap::Args;
use gitpeek_render::ShortcodeRegistry;
use tracing::info;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the expand command.
#[derive(Args)]
pub(crate) struct ExpandArgs {
    /// Markdown file containing shortcodes.
    file: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Default number of commits for history shortcodes (overrides config).
    #[arg(short, long)]
    limit: Option<usize>,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

impl ExpandArgs {
    /// Execute the expand command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the output cannot be
    /// written, or configuration fails to load.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let document = std::fs::read_to_string(&self.file)?;
        info!("Expanding shortcodes in {}", self.file.display());

        let engine = self.common.engine(self.limit, version)?;
        let expanded = ShortcodeRegistry::with_defaults().expand(&engine, &document);

        match &self.output {
            Some(path) => {
                std::fs::write(path, expanded)?;
                output.success(&format!(
                    "Expanded {} -> {}",
                    self.file.display(),
                    path.display()
                ));
            }
            None => output.result(&expanded)?,
        }

        Ok(())
    }
}

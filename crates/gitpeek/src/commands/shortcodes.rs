//! `gitpeek shortcodes` command implementation.

use gitpeek_render::ShortcodeRegistry;

use crate::error::CliError;
use crate::output::Output;

/// List registered shortcodes with their provider and action.
pub(crate) fn execute() -> Result<(), CliError> {
    let output = Output::new();
    let registry = ShortcodeRegistry::with_defaults();

    let listing: String = registry
        .names()
        .filter_map(|name| {
            let binding = registry.get(name)?;
            Some(format!(
                "{} {} {}\n",
                output.highlight(&format!("{name:<20}")),
                binding.provider,
                binding.action
            ))
        })
        .collect();

    output.result(&listing)?;
    Ok(())
}

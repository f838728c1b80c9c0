//! gitpeek CLI - embed git-hosted content.
//!
//! Provides commands for:
//! - `render`: Render a single shortcode to HTML
//! - `expand`: Expand every shortcode in a Markdown document
//! - `shortcodes`: List registered shortcode names

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExpandArgs, RenderArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// gitpeek - embed files, history and update dates from GitHub and GitLab.
#[derive(Parser)]
#[command(name = "gitpeek", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one shortcode to HTML on stdout.
    Render(RenderArgs),
    /// Expand shortcodes in a Markdown file.
    Expand(ExpandArgs),
    /// List registered shortcodes.
    Shortcodes,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Render(args) => args.common.verbose,
        Commands::Expand(args) => args.common.verbose,
        Commands::Shortcodes => false,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(VERSION),
        Commands::Expand(args) => args.execute(VERSION),
        Commands::Shortcodes => commands::shortcodes::execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

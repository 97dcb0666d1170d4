//! CLI definitions for essaypilot.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use essaypilot_protocols::CorrectionMode;

/// essaypilot CLI.
#[derive(Parser)]
#[command(name = "essaypilot")]
#[command(about = "Correction and typing assistant for the essay form, driven over CDP")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Attach to the tab whose URL or title contains this text
    #[arg(short, long, global = true)]
    pub page: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Work through the highlighted errors of the essay
    Correct {
        /// Correction mode (basic, advanced); asked on the page when omitted
        #[arg(long)]
        mode: Option<CorrectionMode>,

        /// Skip the basic-mode confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Draft an essay from the assignment with the AI service
    Generate,

    /// Type text into the essay box character by character
    Type {
        #[command(flatten)]
        source: TextSource,

        /// Delay between characters in milliseconds
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Print the assignment context scraped from the page
    Context,

    /// Validate the configuration file
    CheckConfig,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub(crate) struct TextSource {
    /// Text to type
    #[arg(long)]
    pub text: Option<String>,

    /// File whose contents are typed
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strata markdown site compiler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Markdown source directory (relative to project root)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Theme directory path (relative to project root)
    #[arg(short, long)]
    pub theme: Option<PathBuf>,

    /// Default code highlighting style
    #[arg(long)]
    pub style: Option<String>,

    /// Config file name (default: strata.toml)
    #[arg(short = 'C', long, default_value = "strata.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile the source tree into static files under the output directory
    Gen,

    /// Serve the compiled site over HTTP
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// Recompile the whole tree on every request
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        live: Option<bool>,
    },

    /// Compile for publishing and print the link-to-resource map as JSON
    Bind {
        /// HTML fragment injected at the top of every page
        #[arg(long)]
        head: Option<PathBuf>,

        /// HTML fragment injected at the bottom of every page
        #[arg(long)]
        foot: Option<PathBuf>,
    },

    /// Print the content hash of the source tree
    Hash,
}

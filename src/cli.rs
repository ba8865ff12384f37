use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ripforge")]
#[command(author, version, about = "Rip discs with MakeMKV and encode them with HandBrakeCLI")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive session (default)
    Tui,

    /// Check that MakeMKV and HandBrakeCLI are available
    CheckTools,

    /// List optical drives
    Drives,

    /// List the titles on the disc in a drive
    Titles {
        /// Device path, e.g. /dev/sr0
        device: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List HandBrakeCLI presets
    Presets,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

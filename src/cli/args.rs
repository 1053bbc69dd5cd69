//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Download videos and channels from SwitchTube
#[derive(Parser, Debug)]
#[command(name = "switchdl", author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Output directory for downloaded files [default: .]
    #[arg(short, long, global = true, value_name = "DIR", env = "SWITCHDL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Force overwrite of existing files
    #[arg(short = 'w', long, global = true, env = "SWITCHDL_OVERWRITE")]
    pub overwrite: bool,

    /// Skip files that already exist
    #[arg(short, long, global = true, env = "SWITCHDL_SKIP")]
    pub skip: bool,

    /// Prompt for the quality variant instead of taking the best one
    #[arg(short = 'v', long, global = true, env = "SWITCHDL_SELECT_VARIANT")]
    pub select_variant: bool,

    /// Access token, overrides the stored token
    #[arg(long, global = true, value_name = "TOKEN", env = "SWITCHDL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// HTTP connect timeout (e.g., 30s, 1m) [default: 30s]
    #[arg(long, global = true, value_name = "DURATION")]
    pub timeout: Option<humantime::Duration>,

    /// Disable progress output
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Download one or more videos
    Video {
        /// Video IDs
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,

        /// Output filename, only with a single video
        #[arg(short, long, value_name = "NAME")]
        filename: Option<String>,
    },

    /// Download videos of one or more channels
    Channel {
        /// Channel IDs
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,

        /// Download every video without prompting
        #[arg(short, long)]
        all: bool,
    },

    /// Store the access token in the system keyring
    Configure {
        #[command(subcommand)]
        action: Option<ConfigureAction>,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureAction {
    /// Report whether a token is stored
    Show,
    /// Check the token against the API
    Validate,
    /// Remove the stored token
    Delete,
}

impl Args {
    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        self.global.verbosity_level()
    }
}

impl GlobalArgs {
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Timeout given on the command line
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Into::into)
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

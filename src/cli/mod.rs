//! Command line interface

pub mod args;
pub mod config;
pub mod output;

pub use args::{Args, Command, ConfigureAction, GlobalArgs, VerbosityLevel};
pub use config::{FileConfig, Settings};
pub use output::OutputFormatter;

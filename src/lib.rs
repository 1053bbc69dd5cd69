//! # switchdl - SwitchTube downloader
//!
//! Downloads videos and whole channels from SwitchTube.
//!
//! ## Features
//!
//! - Best-quality or interactive variant selection
//! - Channel downloads with index/range video selection
//! - Overwrite, skip or rename on existing files
//! - Batch runs that continue past failing videos and end with a summary
//! - Access token stored in the system keyring
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchdl::cli::{OutputFormatter, VerbosityLevel};
//! use switchdl::core::{DownloadConfig, Downloader};
//! use switchdl::platform::{AccessToken, ApiClient};
//! use switchdl::resolve::TerminalPrompter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let token = AccessToken::new("my-token");
//!     let client = ApiClient::new(token.clone())?;
//!     let downloader = Downloader::new(client, Arc::new(OutputFormatter::new(VerbosityLevel::Normal)));
//!
//!     let config = DownloadConfig::new(token, "./downloads").with_video_ids(["VIDEO_ID"]);
//!     let outcome = downloader.download_video(&config, &mut TerminalPrompter::new()).await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod download;
pub mod error;
pub mod platform;
pub mod resolve;
pub mod utils;

// Re-export main types
pub use core::{DownloadConfig, DownloadSummary, Downloader, VideoOutcome};
pub use error::SwitchdlError;

/// Result type alias for switchdl operations
pub type Result<T> = std::result::Result<T, SwitchdlError>;

//! Core functionality for switchdl

pub mod config;
pub mod downloader;
pub mod progress;
pub mod summary;
pub mod video_info;

pub use config::*;
pub use downloader::*;
pub use progress::*;
pub use summary::*;
pub use video_info::*;

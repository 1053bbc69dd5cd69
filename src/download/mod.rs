//! Download system for switchdl

pub mod downloader;

pub use downloader::*;

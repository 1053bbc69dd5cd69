//! SwitchTube API client and credential storage

pub mod client;
pub mod credentials;

pub use client::*;
pub use credentials::*;

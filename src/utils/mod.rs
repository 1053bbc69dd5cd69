//! Utility functions for switchdl

pub mod filename;

pub use filename::*;

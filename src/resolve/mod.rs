//! Variant, filename collision and video selection logic, with or without a user at the terminal

pub mod collision;
pub mod prompt;
pub mod quality;
pub mod variant;
pub mod videos;

pub use collision::*;
pub use prompt::*;
pub use quality::*;
pub use variant::*;
pub use videos::*;

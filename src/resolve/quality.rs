//! One-time quality decision for batch downloads

use super::prompt::Prompter;
use crate::error::SwitchdlError;

/// How variants are chosen across a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityMode {
    /// Prompt for every video before downloading starts
    Individual,
    /// Best quality for every video, no prompts
    BestForAll,
}

/// Ask once how to choose quality for a batch
pub fn ask_quality_mode(prompter: &mut dyn Prompter) -> Result<QualityMode, SwitchdlError> {
    prompter.say("");
    prompter.say("Multiple videos detected. How would you like to handle video quality selection?");

    loop {
        let choice = prompter
            .ask("Select quality [I]ndividually for each video / Use [B]est quality for all (i/b): ")?;
        match choice.to_lowercase().as_str() {
            "i" | "individual" | "individually" => return Ok(QualityMode::Individual),
            "b" | "best" => {
                prompter.say("Using best quality for all videos.");
                return Ok(QualityMode::BestForAll);
            }
            _ => prompter.say("Invalid choice. Please enter 'i' or 'b'."),
        }
    }
}

//! Handling of existing output files

use super::prompt::Prompter;
use crate::error::SwitchdlError;
use crate::utils::ensure_extension;
use std::path::{Path, PathBuf};
use tracing::info;

/// Flags deciding what happens when the output file exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionPolicy {
    pub overwrite: bool,
    pub skip: bool,
}

/// Result of collision resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Write to this path
    Proceed(PathBuf),
    /// Leave the existing file alone
    Skip,
}

/// Decide where to write, given that `path` may already exist
pub fn resolve_collision(
    path: PathBuf,
    policy: CollisionPolicy,
    prompter: &mut dyn Prompter,
) -> Result<CollisionOutcome, SwitchdlError> {
    if policy.overwrite {
        if exists(&path)? {
            info!("File {} already exists. Overwriting it.", path.display());
        }
        return Ok(CollisionOutcome::Proceed(path));
    }

    if !exists(&path)? {
        return Ok(CollisionOutcome::Proceed(path));
    }

    if policy.skip {
        prompter.say(&format!(
            "File {} already exists. Skipping download.",
            path.display()
        ));
        return Ok(CollisionOutcome::Skip);
    }

    if !prompter.is_interactive() {
        return Err(SwitchdlError::Collision { path });
    }

    prompt_for_file_action(path, prompter)
}

fn exists(path: &Path) -> Result<bool, SwitchdlError> {
    Ok(path.try_exists()?)
}

fn prompt_for_file_action(
    path: PathBuf,
    prompter: &mut dyn Prompter,
) -> Result<CollisionOutcome, SwitchdlError> {
    loop {
        prompter.say(&format!("Output file {} already exists.", path.display()));
        let choice = prompter.ask("[O]verwrite / [R]ename / [S]kip? (o/r/s): ")?;
        match choice.to_lowercase().as_str() {
            "o" | "overwrite" => return Ok(CollisionOutcome::Proceed(path)),
            "r" | "rename" => {
                let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                return prompt_for_new_filename(&dir, prompter).map(CollisionOutcome::Proceed);
            }
            "s" | "skip" => {
                prompter.say("Skipping download.");
                return Ok(CollisionOutcome::Skip);
            }
            _ => prompter.say("Invalid choice. Please enter o, r, or s."),
        }
    }
}

fn prompt_for_new_filename(
    dir: &Path,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf, SwitchdlError> {
    loop {
        let name = prompter.ask("Enter new filename: ")?;
        if name.is_empty() {
            prompter.say("Filename cannot be empty.");
            continue;
        }

        let name = ensure_extension(&name);
        let candidate = dir.join(&name);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        prompter.say(&format!(
            "File {} already exists. Please choose another name.",
            name
        ));
    }
}

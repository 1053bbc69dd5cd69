//! Quality variant selection

use super::prompt::Prompter;
use crate::core::VideoVariant;
use crate::error::SwitchdlError;
use tracing::debug;

/// Media type of downloadable video variants
pub const EXPECTED_MEDIA_TYPE: &str = "video/mp4";

/// First variant of the expected media type.
///
/// The API lists variants best-quality-first, so this is the best one.
pub fn select_best_variant(variants: &[VideoVariant]) -> Option<&VideoVariant> {
    variants.iter().find(|v| v.media_type == EXPECTED_MEDIA_TYPE)
}

/// Pick the variant to download for `video_id`.
///
/// Prompts only when selection was requested, an input device is attached
/// and more than one variant of the expected type exists.
pub fn resolve_variant(
    variants: &[VideoVariant],
    video_id: &str,
    select_variant: bool,
    prompter: &mut dyn Prompter,
) -> Result<VideoVariant, SwitchdlError> {
    let candidates: Vec<&VideoVariant> = variants
        .iter()
        .filter(|v| v.media_type == EXPECTED_MEDIA_TYPE)
        .collect();

    if candidates.len() <= 1 || !select_variant || !prompter.is_interactive() {
        debug!(
            "Auto-selecting best variant for {} ({} candidates)",
            video_id,
            candidates.len()
        );
        return select_best_variant(variants)
            .cloned()
            .ok_or_else(|| SwitchdlError::NoVariant {
                video_id: video_id.to_string(),
            });
    }

    select_variant_interactively(&candidates, prompter)
}

fn select_variant_interactively(
    candidates: &[&VideoVariant],
    prompter: &mut dyn Prompter,
) -> Result<VideoVariant, SwitchdlError> {
    prompter.say("");
    prompter.say("Available video variants:");
    for (i, variant) in candidates.iter().enumerate() {
        prompter.say(&format!("[{}] {} ({})", i + 1, variant.label, variant.media_type));
    }

    let count = candidates.len();
    loop {
        let choice = prompter.ask(&format!("Select variant (1-{}): ", count))?;
        match choice.parse::<usize>() {
            Ok(index) if (1..=count).contains(&index) => return Ok(candidates[index - 1].clone()),
            _ => prompter.say(&format!(
                "Invalid choice. Please enter a number between 1 and {}.",
                count
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ScriptedPrompter;

    fn variants() -> Vec<VideoVariant> {
        vec![
            VideoVariant::new("/audio.m4a", "audio", "audio/mp4"),
            VideoVariant::new("/hd.mp4", "1080p", "video/mp4"),
            VideoVariant::new("/sd.mp4", "480p", "video/mp4"),
        ]
    }

    #[test]
    fn test_best_is_first_matching() {
        let variants = variants();
        assert_eq!(select_best_variant(&variants).unwrap().label, "1080p");
        assert!(select_best_variant(&variants[..1]).is_none());
        assert!(select_best_variant(&[]).is_none());
    }

    #[test]
    fn test_auto_selection_when_not_requested() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let chosen = resolve_variant(&variants(), "v1", false, &mut prompter).unwrap();
        assert_eq!(chosen.path, "/hd.mp4");
        assert!(prompter.transcript().is_empty());
    }

    #[test]
    fn test_auto_selection_when_non_interactive() {
        let mut prompter = ScriptedPrompter::non_interactive();
        let chosen = resolve_variant(&variants(), "v1", true, &mut prompter).unwrap();
        assert_eq!(chosen.label, "1080p");
    }

    #[test]
    fn test_single_candidate_never_prompts() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let chosen = resolve_variant(&variants()[..2], "v1", true, &mut prompter).unwrap();
        assert_eq!(chosen.label, "1080p");
    }

    #[test]
    fn test_no_matching_variant() {
        let mut prompter = ScriptedPrompter::non_interactive();
        let err = resolve_variant(&variants()[..1], "v9", true, &mut prompter).unwrap_err();
        assert!(matches!(err, SwitchdlError::NoVariant { ref video_id } if video_id == "v9"));
        assert!(err.to_string().contains("v9"));
    }

    #[test]
    fn test_interactive_selection_reprompts_on_invalid_input() {
        let mut prompter = ScriptedPrompter::new(["abc", "0", "3", "2"]);
        let chosen = resolve_variant(&variants(), "v1", true, &mut prompter).unwrap();
        assert_eq!(chosen.label, "480p");
        assert!(prompter.saw("[1] 1080p (video/mp4)"));
        assert!(prompter.saw("[2] 480p (video/mp4)"));
        assert!(prompter.saw("Select variant (1-2): "));
        assert_eq!(prompter.remaining_answers(), 0);
    }

    #[test]
    fn test_interactive_selection_input_failure() {
        let mut prompter = ScriptedPrompter::new(["x"]);
        let err = resolve_variant(&variants(), "v1", true, &mut prompter).unwrap_err();
        assert!(matches!(err, SwitchdlError::Input(_)));
    }
}

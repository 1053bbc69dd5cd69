//! Safe filename generation utilities

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Extension every downloaded video gets
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Filename used when a video has no usable title
pub const FALLBACK_FILENAME: &str = "video.mp4";

/// Maximum number of characters kept from a title
pub const MAX_FILENAME_CHARS: usize = 255;

/// Permission mode for created directories
pub const DIRECTORY_MODE: u32 = 0o755;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("static regex is valid"));

/// Replace characters illegal in paths with `_`, trim and truncate
pub fn sanitize_filename(name: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(name, "_");
    replaced.trim().chars().take(MAX_FILENAME_CHARS).collect()
}

/// Append the video extension unless already present
pub fn ensure_extension(name: &str) -> String {
    if name.ends_with(VIDEO_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, VIDEO_EXTENSION)
    }
}

/// Output filename for a video.
///
/// An explicit name is used verbatim apart from the extension; otherwise the
/// name comes from the sanitized title.
pub fn derive_filename(explicit: Option<&str>, title: &str) -> String {
    if let Some(name) = explicit.filter(|n| !n.is_empty()) {
        return ensure_extension(name);
    }

    let safe_title = sanitize_filename(title);
    if safe_title.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        ensure_extension(&safe_title)
    }
}

/// Create a directory and its parents
pub fn create_output_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIRECTORY_MODE);
    }
    builder.create(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_filename_from_title() {
        assert_eq!(derive_filename(None, "Intro: Lecture/1"), "Intro_ Lecture_1.mp4");
        assert_eq!(
            derive_filename(None, "Video with <invalid> chars"),
            "Video with _invalid_ chars.mp4"
        );
        assert_eq!(derive_filename(None, "  padded  "), "padded.mp4");
    }

    #[test]
    fn test_derive_filename_fallback() {
        assert_eq!(derive_filename(None, ""), FALLBACK_FILENAME);
        assert_eq!(derive_filename(None, "   "), FALLBACK_FILENAME);
    }

    #[test]
    fn test_derive_filename_explicit() {
        assert_eq!(derive_filename(Some("my talk"), "ignored"), "my talk.mp4");
        assert_eq!(derive_filename(Some("clip.mp4"), "ignored"), "clip.mp4");
        assert_eq!(derive_filename(Some(""), "Title"), "Title.mp4");
    }

    #[test]
    fn test_sanitize_removes_all_illegal_chars() {
        let title = r#"a<b>c:d"e/f\g|h?i*j"#;
        let derived = derive_filename(None, title);
        for c in ['<', '>', ':', '"', '/', '\\', '|', '?', '*'] {
            assert!(!derived.contains(c), "{} still contains {:?}", derived, c);
        }
        assert_eq!(derived, "a_b_c_d_e_f_g_h_i_j.mp4");
        assert!(derived.ends_with(VIDEO_EXTENSION));
    }

    #[test]
    fn test_sanitize_truncates_by_chars() {
        let long = "é".repeat(300);
        let sanitized = sanitize_filename(&long);
        assert_eq!(sanitized.chars().count(), MAX_FILENAME_CHARS);
        assert!(derive_filename(None, &long).ends_with(VIDEO_EXTENSION));
    }

    #[test]
    fn test_ensure_extension_idempotent() {
        for name in ["a", "a.mp4", "", "clip.mp4.mp4", "x.mkv"] {
            let once = ensure_extension(name);
            assert_eq!(ensure_extension(&once), once);
        }
        assert_eq!(ensure_extension("x.mkv"), "x.mkv.mp4");
    }

    #[test]
    fn test_create_output_dir_nested() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        create_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // existing directory is fine
        create_output_dir(&nested).unwrap();
    }
}

//! Output formatting

use crate::cli::args::VerbosityLevel;
use crate::core::summary::DownloadSummary;
use colored::Colorize;
use std::io::IsTerminal;

/// Output formatter for switchdl
#[derive(Debug)]
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Whether progress bars should be drawn
    pub fn show_progress(&self, no_progress: bool) -> bool {
        !no_progress && self.verbosity != VerbosityLevel::Quiet && std::io::stderr().is_terminal()
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("{}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("✅ {}", message.green());
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("⚠️  {}", message.yellow());
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message.red());
    }

    /// Print debug message
    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            println!("🐛 {}", message.dimmed());
        }
    }

    /// Header shown before each video of a batch, `index` is zero-based
    pub fn print_processing_header(&self, index: usize, total: usize, video_id: &str) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }
        println!();
        let header = format!("Processing video {}/{} (ID: {})", index + 1, total, video_id);
        println!("{}", header.bold());
    }

    /// Print the batch summary; in quiet mode only the failures
    pub fn print_summary(&self, summary: &DownloadSummary) {
        if self.verbosity == VerbosityLevel::Quiet {
            for line in failure_lines(summary) {
                eprintln!("{}", line.red());
            }
            return;
        }
        for line in summary_lines(summary) {
            println!("{}", line);
        }
    }

    /// Print version information
    pub fn print_version(&self) {
        println!("switchdl {}", env!("CARGO_PKG_VERSION"));
    }
}

/// Lines of the batch summary
pub fn summary_lines(summary: &DownloadSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "Download Summary:".to_string(),
        format!("Total: {}", summary.total),
        format!("Succeeded: {}", summary.succeeded),
        format!("Failed: {}", summary.failed),
    ];

    if summary.failed > 0 {
        lines.push(String::new());
        lines.push("Failed downloads:".to_string());
        lines.extend(failure_lines(summary));
    }
    lines
}

fn failure_lines(summary: &DownloadSummary) -> Vec<String> {
    summary
        .failures()
        .filter_map(|result| {
            result
                .error
                .as_ref()
                .map(|e| format!("- {}: {}", result.video_id, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwitchdlError;

    fn summary() -> DownloadSummary {
        let mut summary = DownloadSummary::new(3);
        summary.record("a", Ok(()));
        summary.record::<()>(
            "b",
            Err(SwitchdlError::UnexpectedStatus {
                context: "video details",
                status: 500,
            }),
        );
        summary.record("c", Ok(()));
        summary
    }

    #[test]
    fn test_output_formatter_verbosity_levels() {
        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        assert_eq!(formatter.verbosity(), VerbosityLevel::Normal);

        let formatter = OutputFormatter::new(VerbosityLevel::Quiet);
        assert_eq!(formatter.verbosity(), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_quiet_mode_hides_progress() {
        let formatter = OutputFormatter::new(VerbosityLevel::Quiet);
        assert!(!formatter.show_progress(false));

        let formatter = OutputFormatter::new(VerbosityLevel::Normal);
        assert!(!formatter.show_progress(true));
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&summary());
        assert!(lines.contains(&"Total: 3".to_string()));
        assert!(lines.contains(&"Succeeded: 2".to_string()));
        assert!(lines.contains(&"Failed: 1".to_string()));
        assert!(lines.contains(&"- b: unexpected status code for video details: 500".to_string()));
    }

    #[test]
    fn test_summary_without_failures_has_no_failure_section() {
        let mut summary = DownloadSummary::new(2);
        summary.record("a", Ok(()));
        summary.record("b", Ok(()));
        let lines = summary_lines(&summary);
        assert!(!lines.iter().any(|l| l.starts_with("Failed downloads")));
    }

    #[test]
    fn test_verbosity_levels() {
        let formatter = OutputFormatter::new(VerbosityLevel::Quiet);
        // These should not print anything in quiet mode
        formatter.info("test");
        formatter.success("test");
        formatter.warning("test");
        formatter.debug("test");
        formatter.print_processing_header(0, 2, "abc");

        // Error should always print
        formatter.error("test");
        formatter.print_summary(&summary());
    }
}

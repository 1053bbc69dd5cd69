//! Progress reporting for media downloads

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const DETERMINATE_TEMPLATE: &str =
    "Downloading: {binary_bytes} / {binary_total_bytes} [{bar:64}] {percent}% | {eta}";
const INDETERMINATE_TEMPLATE: &str = "Downloading: {binary_bytes} (unknown size)";

/// Byte counter for one download, rendered as a terminal progress bar.
///
/// With a declared content length the bar is determinate and ends at 100%;
/// without one it only counts bytes.
pub struct ProgressReporter {
    bar: ProgressBar,
    total: Option<u64>,
    transferred: u64,
}

impl ProgressReporter {
    /// Create a reporter; a zero length counts as unknown
    pub fn new(total: Option<u64>, visible: bool) -> Self {
        let total = total.filter(|&t| t > 0);
        let bar = match (visible, total) {
            (false, _) => ProgressBar::hidden(),
            (true, Some(len)) => {
                let bar = ProgressBar::new(len);
                bar.set_style(determinate_style());
                bar
            }
            (true, None) => {
                let bar = ProgressBar::no_length();
                bar.set_style(indeterminate_style());
                bar.enable_steady_tick(Duration::from_millis(200));
                bar
            }
        };
        if let Some(len) = total {
            bar.set_length(len);
        }

        Self {
            bar,
            total,
            transferred: 0,
        }
    }

    /// Record `bytes` more transferred bytes
    pub fn advance(&mut self, bytes: u64) {
        self.transferred += bytes;
        self.bar.inc(bytes);
    }

    /// Complete the bar
    pub fn finish(&self) {
        if self.total.is_some() {
            self.bar.finish();
        } else {
            self.bar.finish_and_clear();
        }
    }

    /// Stop drawing without completing, the bar stays where it failed
    pub fn abandon(&self) {
        self.bar.abandon();
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn is_determinate(&self) -> bool {
        self.total.is_some()
    }

    /// Completion percentage, `None` for unknown sizes
    pub fn percent(&self) -> Option<f64> {
        self.total
            .map(|total| (self.transferred.min(total) as f64 / total as f64) * 100.0)
    }
}

fn determinate_style() -> ProgressStyle {
    ProgressStyle::with_template(DETERMINATE_TEMPLATE)
        .map(|style| style.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn indeterminate_style() -> ProgressStyle {
    ProgressStyle::with_template(INDETERMINATE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Format bytes with binary prefixes
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / THRESHOLD.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f64 / THRESHOLD.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}

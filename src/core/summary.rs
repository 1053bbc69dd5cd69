//! Per-video results of a batch run

use crate::error::SwitchdlError;

/// Outcome of one video in a batch
#[derive(Debug)]
pub struct DownloadResult {
    pub video_id: String,
    pub error: Option<SwitchdlError>,
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate of a batch run. Append-only while the batch runs.
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<DownloadResult>,
}

impl DownloadSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
            results: Vec::with_capacity(total),
        }
    }

    /// Record the outcome of one video
    pub fn record<T>(&mut self, video_id: &str, outcome: Result<T, SwitchdlError>) {
        let error = outcome.err();
        if error.is_some() {
            self.failed += 1;
        } else {
            self.succeeded += 1;
        }
        self.results.push(DownloadResult {
            video_id: video_id.to_string(),
            error,
        });
    }

    pub fn failures(&self) -> impl Iterator<Item = &DownloadResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// A batch fails as a whole only when nothing succeeded
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.succeeded == 0
    }

    /// Whether any item was stopped by an interrupt
    pub fn was_cancelled(&self) -> bool {
        self.results
            .iter()
            .any(|r| matches!(r.error, Some(SwitchdlError::Cancelled)))
    }
}

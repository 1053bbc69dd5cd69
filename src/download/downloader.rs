//! Streaming of media bodies to disk

use crate::core::progress::{format_bytes, ProgressReporter};
use crate::error::SwitchdlError;
use futures_util::StreamExt;
use reqwest::Response;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Writes a response body to a file while reporting progress.
///
/// There is no retry or resume: on failure the partial file stays on disk.
#[derive(Debug, Clone)]
pub struct StreamDownloader {
    show_progress: bool,
    cancel: CancellationToken,
}

impl StreamDownloader {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            show_progress: true,
            cancel,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Stream `response` into `output_path`, returning the number of bytes written
    pub async fn save(&self, response: Response, output_path: &Path) -> Result<u64, SwitchdlError> {
        let mut file = File::create(output_path).await?;
        let mut progress = ProgressReporter::new(response.content_length(), self.show_progress);

        match self.copy_body(response, &mut file, &mut progress).await {
            Ok(()) => {
                progress.finish();
                info!(
                    "Download completed: {} written to {}",
                    format_bytes(progress.transferred()),
                    output_path.display()
                );
                Ok(progress.transferred())
            }
            Err(e) => {
                progress.abandon();
                Err(e)
            }
        }
    }

    async fn copy_body(
        &self,
        response: Response,
        file: &mut File,
        progress: &mut ProgressReporter,
    ) -> Result<(), SwitchdlError> {
        let mut stream = response.bytes_stream();

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(SwitchdlError::Cancelled),
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk?;

            file.write_all(&chunk).await?;
            progress.advance(chunk.len() as u64);
            debug!("Downloaded {} bytes, total: {}", chunk.len(), progress.transferred());
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

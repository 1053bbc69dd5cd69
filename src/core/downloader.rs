//! Download orchestration for single videos, batches and channels

use crate::cli::output::OutputFormatter;
use crate::core::config::DownloadConfig;
use crate::core::summary::DownloadSummary;
use crate::core::video_info::{VideoMetadata, VideoVariant};
use crate::download::StreamDownloader;
use crate::error::SwitchdlError;
use crate::platform::ApiClient;
use crate::resolve::{
    ask_quality_mode, resolve_collision, resolve_variant, select_videos_interactively,
    CollisionOutcome, Prompter, QualityMode,
};
use crate::utils::{create_output_dir, derive_filename, sanitize_filename};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Terminal state of a single video download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoOutcome {
    /// The media was written to this path
    Downloaded(PathBuf),
    /// An existing file was kept
    Skipped,
}

/// Sequences API calls, user decisions and streaming for every download command
pub struct Downloader {
    client: ApiClient,
    formatter: Arc<OutputFormatter>,
    show_progress: bool,
}

impl Downloader {
    pub fn new(client: ApiClient, formatter: Arc<OutputFormatter>) -> Self {
        Self {
            client,
            formatter,
            show_progress: true,
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download the first video of `config`; errors propagate to the caller
    pub async fn download_video(
        &self,
        config: &DownloadConfig,
        prompter: &mut dyn Prompter,
    ) -> Result<VideoOutcome, SwitchdlError> {
        config.validate()?;
        let video_id = config
            .video_ids
            .first()
            .ok_or_else(|| SwitchdlError::Validation("no video ID specified".to_string()))?;

        self.run_video(video_id, config, None, prompter).await
    }

    /// Download every video of `config` in order, recording each outcome.
    ///
    /// A failing video never stops the batch.
    pub async fn download_videos(
        &self,
        config: &DownloadConfig,
        prompter: &mut dyn Prompter,
    ) -> DownloadSummary {
        let total = config.video_ids.len();
        let mut summary = DownloadSummary::new(total);

        if let Err(e) = config.validate() {
            for video_id in &config.video_ids {
                summary.record::<()>(video_id, Err(SwitchdlError::Validation(e.to_string())));
            }
            return summary;
        }

        let quality_mode = self.quality_mode(config, prompter);
        let mut preselected = match quality_mode {
            Some(QualityMode::Individual) => self.preselect_variants(config, prompter).await,
            _ => Vec::new(),
        }
        .into_iter();
        let select_variant = match quality_mode {
            Some(_) => false,
            None => config.select_variant,
        };

        self.formatter
            .info(&format!("Starting download of {} video(s)", total));

        for (index, video_id) in config.video_ids.iter().enumerate() {
            self.formatter.print_processing_header(index, total, video_id);
            let video_config = config.scoped_for(video_id, select_variant);

            let outcome = match preselected.next() {
                Some(Err(e)) => Err(e),
                Some(Ok(variant)) => {
                    self.run_video(video_id, &video_config, Some(variant), prompter)
                        .await
                }
                None => self.run_video(video_id, &video_config, None, prompter).await,
            };

            if let Err(e) = &outcome {
                self.formatter
                    .error(&format!("Failed to download video {}: {}", video_id, e));
            }
            summary.record(video_id, outcome);
        }

        if summary.total > 1 {
            self.formatter.print_summary(&summary);
        }
        summary
    }

    /// Download the selected videos of a channel into a subdirectory named after it.
    ///
    /// Fetching the channel or any of its video details aborts the whole
    /// operation. Returns `None` when there was nothing to download.
    pub async fn download_channel(
        &self,
        config: &DownloadConfig,
        channel_id: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<DownloadSummary>, SwitchdlError> {
        config.validate()?;
        if !config.select_all && !prompter.is_interactive() {
            return Err(SwitchdlError::Validation(
                "no input device attached to select videos; use --all (-a) to download every video of the channel".to_string(),
            ));
        }

        let channel = self.client.fetch_channel_details(channel_id).await?;
        let listing = self.client.fetch_channel_videos(channel_id).await?;

        if listing.is_empty() {
            self.formatter.info("No videos found in this channel.");
            return Ok(None);
        }
        self.formatter.info(&format!(
            "Found {} videos in channel '{}'",
            listing.len(),
            channel.name
        ));

        let mut videos: Vec<VideoMetadata> = Vec::with_capacity(listing.len());
        for entry in &listing {
            debug!("Fetching details of channel video {}", entry.id);
            videos.push(self.client.fetch_video_details(&entry.id).await?);
        }

        let selected = if config.select_all {
            videos
        } else {
            select_videos_interactively(&videos, prompter)?
        };

        if selected.is_empty() {
            self.formatter.info("No videos selected.");
            return Ok(None);
        }

        let channel_dir = config.output_dir.join(sanitize_filename(&channel.name));
        create_output_dir(&channel_dir)?;
        self.formatter.info(&format!(
            "Downloading {} video(s) to '{}'",
            selected.len(),
            channel_dir.display()
        ));

        let video_ids = selected.into_iter().map(|video| video.id).collect();
        let batch = config.for_channel(channel_dir, video_ids);
        Ok(Some(self.download_videos(&batch, prompter).await))
    }

    /// Ask once how to choose quality, `None` when there is nothing to ask
    fn quality_mode(
        &self,
        config: &DownloadConfig,
        prompter: &mut dyn Prompter,
    ) -> Option<QualityMode> {
        if config.video_ids.len() < 2 || !config.select_variant || !prompter.is_interactive() {
            return None;
        }

        match ask_quality_mode(prompter) {
            Ok(mode) => Some(mode),
            // every item fails fast as cancelled from here on
            Err(SwitchdlError::Cancelled) => Some(QualityMode::BestForAll),
            Err(e) => {
                warn!("Failed to read quality selection: {}. Using best quality.", e);
                self.formatter
                    .warning("Failed to read selection. Defaulting to best quality.");
                Some(QualityMode::BestForAll)
            }
        }
    }

    /// Resolve one variant per video before any bytes are downloaded
    async fn preselect_variants(
        &self,
        config: &DownloadConfig,
        prompter: &mut dyn Prompter,
    ) -> Vec<Result<VideoVariant, SwitchdlError>> {
        let total = config.video_ids.len();
        let mut choices = Vec::with_capacity(total);

        for (index, video_id) in config.video_ids.iter().enumerate() {
            self.formatter.print_processing_header(index, total, video_id);
            let choice = match self.client.fetch_video_variants(video_id).await {
                Ok(variants) => resolve_variant(&variants, video_id, true, prompter),
                Err(e) => Err(e),
            };
            choices.push(choice);
        }
        choices
    }

    async fn run_video(
        &self,
        video_id: &str,
        config: &DownloadConfig,
        preselected: Option<VideoVariant>,
        prompter: &mut dyn Prompter,
    ) -> Result<VideoOutcome, SwitchdlError> {
        let metadata = self.client.fetch_video_details(video_id).await?;

        let variant = match preselected {
            Some(variant) => variant,
            None => {
                let variants = self.client.fetch_video_variants(video_id).await?;
                resolve_variant(&variants, video_id, config.select_variant, prompter)?
            }
        };
        debug!("Selected variant '{}' for {}", variant.label, video_id);
        self.formatter
            .debug(&format!("Using variant {} ({})", variant.label, variant.media_type));

        let filename = derive_filename(config.filename.as_deref(), &metadata.title);
        self.formatter
            .info(&format!("Downloading video \"{}\"", filename));

        let output_path = config.output_dir.join(filename);
        let output_path = match resolve_collision(output_path, config.collision_policy(), prompter)? {
            CollisionOutcome::Proceed(path) => path,
            CollisionOutcome::Skip => return Ok(VideoOutcome::Skipped),
        };

        let response = self.client.stream_download(&variant.path).await?;
        StreamDownloader::new(self.client.cancellation_token().clone())
            .with_progress(self.show_progress)
            .save(response, &output_path)
            .await?;

        info!("Saved {} to {}", video_id, output_path.display());
        self.formatter.success(&format!(
            "Video \"{}\" downloaded successfully",
            output_path.display()
        ));
        Ok(VideoOutcome::Downloaded(output_path))
    }
}

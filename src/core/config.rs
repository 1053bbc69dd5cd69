//! Download configuration

use crate::error::SwitchdlError;
use crate::platform::AccessToken;
use crate::resolve::CollisionPolicy;
use std::path::PathBuf;

/// Resolved configuration of one download command.
///
/// Built once from the command line and never mutated afterwards; batch
/// processing derives narrowed copies per video.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// API credential
    pub access_token: AccessToken,
    /// Directory the files are written to
    pub output_dir: PathBuf,
    /// Explicit output filename, single-video downloads only
    pub filename: Option<String>,
    /// Replace existing files
    pub overwrite: bool,
    /// Skip existing files
    pub skip: bool,
    /// Prompt for the quality variant
    pub select_variant: bool,
    /// Take every channel video without prompting
    pub select_all: bool,
    /// Target video IDs
    pub video_ids: Vec<String>,
    /// Target channel ID
    pub channel_id: Option<String>,
}

impl DownloadConfig {
    pub fn new(access_token: AccessToken, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            access_token,
            output_dir: output_dir.into(),
            filename: None,
            overwrite: false,
            skip: false,
            select_variant: false,
            select_all: false,
            video_ids: Vec::new(),
            channel_id: None,
        }
    }

    pub fn with_video_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.video_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_select_variant(mut self, select_variant: bool) -> Self {
        self.select_variant = select_variant;
        self
    }

    pub fn with_select_all(mut self, select_all: bool) -> Self {
        self.select_all = select_all;
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Reject flag combinations that can never succeed
    pub fn validate(&self) -> Result<(), SwitchdlError> {
        if self.overwrite && self.skip {
            return Err(SwitchdlError::Validation(
                "cannot use --overwrite (-w) and --skip (-s) flags together".to_string(),
            ));
        }
        if self.filename.is_some() && self.video_ids.len() > 1 {
            return Err(SwitchdlError::Validation(
                "--filename (-f) can only be used when downloading a single video".to_string(),
            ));
        }
        Ok(())
    }

    /// Narrowed copy for one video of a batch
    pub fn scoped_for(&self, video_id: &str, select_variant: bool) -> DownloadConfig {
        DownloadConfig {
            access_token: self.access_token.clone(),
            output_dir: self.output_dir.clone(),
            filename: None,
            overwrite: self.overwrite,
            skip: self.skip,
            select_variant,
            select_all: false,
            video_ids: vec![video_id.to_string()],
            channel_id: None,
        }
    }

    /// Batch configuration for the selected videos of a channel
    pub fn for_channel(&self, channel_dir: PathBuf, video_ids: Vec<String>) -> DownloadConfig {
        DownloadConfig {
            access_token: self.access_token.clone(),
            output_dir: channel_dir,
            filename: None,
            overwrite: self.overwrite,
            skip: self.skip,
            select_variant: self.select_variant,
            select_all: false,
            video_ids,
            channel_id: None,
        }
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        CollisionPolicy {
            overwrite: self.overwrite,
            skip: self.skip,
        }
    }
}

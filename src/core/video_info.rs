//! Video and channel metadata returned by the SwitchTube API

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metadata of a single video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video ID
    pub id: String,
    /// Video title, may be empty
    #[serde(default)]
    pub title: String,
    /// Last publish time, RFC3339 with offset (e.g. `2025-06-02T11:08:32.977+02:00`)
    #[serde(default)]
    pub published_at: Option<String>,
    /// Duration in milliseconds; may differ slightly from the media files
    #[serde(rename = "duration_in_milliseconds", default)]
    pub duration_ms: u64,
}

impl VideoMetadata {
    /// Create metadata with only an ID and title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            published_at: None,
            duration_ms: 0,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Duration as `HH:MM:SS`
    pub fn formatted_duration(&self) -> String {
        let total_seconds = self.duration().as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    /// Publish date as `YYYY-MM-DD` in the publisher's offset, `N/A` when missing or unparsable
    pub fn formatted_date(&self) -> String {
        self.published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// An encoded rendition of a video.
///
/// The API returns variants best-quality-first, so list order is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoVariant {
    /// Media path relative to the API base URL
    pub path: String,
    /// Label distinguishing the variant (not a display title)
    #[serde(rename = "name", default)]
    pub label: String,
    /// MIME type, `video/mp4` for downloadable video
    #[serde(default)]
    pub media_type: String,
    /// Expiry marker, informational only
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl VideoVariant {
    pub fn new(path: impl Into<String>, label: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            media_type: media_type.into(),
            expires_at: None,
        }
    }
}

/// Channel details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Entry of a channel's video list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelVideo {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

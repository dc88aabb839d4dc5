//! Video information structures as reported by the extraction engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of combined and video-only formats reported
pub const MAX_LISTED_FORMATS: usize = 10;
/// Maximum number of audio-only formats reported
pub const MAX_LISTED_AUDIO_FORMATS: usize = 5;
/// Maximum description length (in characters) reported
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Video (or playlist) metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoInfo {
    /// Video ID
    pub id: Option<String>,
    /// Video or playlist title
    pub title: Option<String>,
    /// Video duration in seconds
    pub duration: Option<f64>,
    /// Video view count
    pub view_count: Option<u64>,
    /// Upload date (YYYYMMDD)
    pub upload_date: Option<String>,
    /// Uploader/channel name
    pub uploader: Option<String>,
    /// Video description
    pub description: Option<String>,
    /// Video thumbnail URL
    pub thumbnail: Option<String>,
    /// Available formats
    pub formats: Vec<Format>,
    /// Playlist entries; the engine reports unavailable entries as null
    pub entries: Option<Vec<Option<VideoInfo>>>,
    /// Output path the engine chose for this item, before post-processing
    #[serde(rename = "_filename")]
    pub filename: Option<String>,
}

impl VideoInfo {
    /// Title, or a placeholder when the engine did not report one
    pub fn title_or(&self, fallback: &str) -> String {
        self.title.clone().unwrap_or_else(|| fallback.to_string())
    }

    /// Duration in whole seconds
    pub fn duration_secs(&self) -> u64 {
        self.duration.map(|d| d.max(0.0) as u64).unwrap_or(0)
    }

    /// Description truncated for display
    pub fn short_description(&self) -> String {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => {
                let truncated: String = d.chars().take(MAX_DESCRIPTION_CHARS).collect();
                format!("{}...", truncated)
            }
            _ => String::new(),
        }
    }

    /// Non-null playlist entries
    pub fn playlist_entries(&self) -> impl Iterator<Item = &VideoInfo> {
        self.entries.iter().flatten().flatten()
    }
}

/// Video format information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    /// Engine format ID
    pub format_id: Option<String>,
    /// Container extension
    pub ext: Option<String>,
    /// Resolution label (e.g. "1920x1080", "audio only")
    pub resolution: Option<String>,
    /// Video height
    pub height: Option<u32>,
    /// Video width
    pub width: Option<u32>,
    /// Frame rate
    pub fps: Option<f64>,
    /// File size in bytes (if known)
    pub filesize: Option<u64>,
    /// Video codec, "none" for audio-only
    pub vcodec: Option<String>,
    /// Audio codec, "none" for video-only
    pub acodec: Option<String>,
    /// Total bitrate (kbps)
    pub tbr: Option<f64>,
    /// Video bitrate (kbps)
    pub vbr: Option<f64>,
    /// Audio bitrate (kbps)
    pub abr: Option<f64>,
}

impl Format {
    fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none")
    }

    fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some("none")
    }

    /// Check if format carries both video and audio
    pub fn is_combined(&self) -> bool {
        self.has_video() && self.has_audio()
    }

    /// Check if format is video-only
    pub fn is_video_only(&self) -> bool {
        self.has_video() && !self.has_audio()
    }

    /// Check if format is audio-only
    pub fn is_audio_only(&self) -> bool {
        !self.has_video() && self.has_audio()
    }
}

/// Flattened format entry returned by the info endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSummary {
    pub format_id: String,
    pub ext: String,
    pub resolution: String,
    pub height: u32,
    pub width: u32,
    pub fps: f64,
    pub filesize: u64,
    pub vcodec: String,
    pub acodec: String,
    pub tbr: f64,
    pub vbr: f64,
    pub abr: f64,
}

impl From<&Format> for FormatSummary {
    fn from(f: &Format) -> Self {
        Self {
            format_id: f.format_id.clone().unwrap_or_default(),
            ext: f.ext.clone().unwrap_or_default(),
            resolution: f.resolution.clone().unwrap_or_else(|| "Unknown".to_string()),
            height: f.height.unwrap_or(0),
            width: f.width.unwrap_or(0),
            fps: f.fps.unwrap_or(0.0),
            filesize: f.filesize.unwrap_or(0),
            vcodec: f.vcodec.clone().unwrap_or_else(|| "none".to_string()),
            acodec: f.acodec.clone().unwrap_or_else(|| "none".to_string()),
            tbr: f.tbr.unwrap_or(0.0),
            vbr: f.vbr.unwrap_or(0.0),
            abr: f.abr.unwrap_or(0.0),
        }
    }
}

/// Formats grouped by stream composition, best first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatBuckets {
    pub combined: Vec<FormatSummary>,
    pub video_only: Vec<FormatSummary>,
    pub audio_only: Vec<FormatSummary>,
    /// Distinct heights as "<h>p", highest first
    pub available_qualities: Vec<String>,
}

impl FormatBuckets {
    /// Group, sort and truncate formats for display
    pub fn from_formats(formats: &[Format]) -> Self {
        let mut combined = Vec::new();
        let mut video_only = Vec::new();
        let mut audio_only = Vec::new();

        for f in formats {
            if f.is_combined() {
                combined.push(FormatSummary::from(f));
            } else if f.is_video_only() {
                video_only.push(FormatSummary::from(f));
            } else if f.is_audio_only() {
                audio_only.push(FormatSummary::from(f));
            }
        }

        combined.sort_by(|a, b| b.height.cmp(&a.height).then(b.tbr.total_cmp(&a.tbr)));
        video_only.sort_by(|a, b| b.height.cmp(&a.height).then(b.vbr.total_cmp(&a.vbr)));
        audio_only.sort_by(|a, b| b.abr.total_cmp(&a.abr));

        let heights: BTreeSet<u32> = combined
            .iter()
            .chain(video_only.iter())
            .map(|f| f.height)
            .filter(|h| *h > 0)
            .collect();
        let available_qualities = heights.iter().rev().map(|h| format!("{}p", h)).collect();

        combined.truncate(MAX_LISTED_FORMATS);
        video_only.truncate(MAX_LISTED_FORMATS);
        audio_only.truncate(MAX_LISTED_AUDIO_FORMATS);

        Self {
            combined,
            video_only,
            audio_only,
            available_qualities,
        }
    }
}

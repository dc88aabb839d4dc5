//! Format selection: turns a requested (format, quality) pair into an engine
//! format expression and a list of post-processing steps.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Height used when a quality string carries no usable digits
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Bitrate (kbps) used when transcoding audio to mp3
pub const MP3_BITRATE_KBPS: u32 = 192;

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D").expect("non-digit pattern is valid"));

/// Quality selection criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySelector {
    /// Best quality available
    Best,
    /// Worst quality available
    Worst,
    /// Height less than or equal to
    HeightLessOrEqual(u32),
}

impl QualitySelector {
    /// Parse a quality string such as "best", "worst", "720p" or "1080"
    pub fn parse(s: &str) -> Self {
        match s {
            "best" => QualitySelector::Best,
            "worst" => QualitySelector::Worst,
            other => QualitySelector::HeightLessOrEqual(parse_height(other)),
        }
    }
}

/// Extract the numeric height from a quality string, defaulting to 1080
pub fn parse_height(quality: &str) -> u32 {
    NON_DIGITS
        .replace_all(quality, "")
        .parse::<u32>()
        .unwrap_or(DEFAULT_HEIGHT)
}

/// Requested output container or explicit engine format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatRequest {
    /// Explicit engine format identifier, passed through verbatim
    FormatId(String),
    /// Audio only, transcoded to mp3
    Mp3,
    /// mp4 video with m4a audio
    Mp4,
    /// Any container
    Any,
}

impl FormatRequest {
    /// Parse a format string
    pub fn parse(s: &str) -> Self {
        if !s.is_empty() && (s.chars().all(|c| c.is_ascii_digit()) || s.contains('-')) {
            return FormatRequest::FormatId(s.to_string());
        }
        match s {
            "mp3" => FormatRequest::Mp3,
            "mp4" => FormatRequest::Mp4,
            _ => FormatRequest::Any,
        }
    }

    /// Whether the final file extension is rewritten by post-processing
    pub fn forced_extension(&self) -> Option<&'static str> {
        match self {
            FormatRequest::Mp3 => Some("mp3"),
            _ => None,
        }
    }
}

/// A post-processing step applied by the engine after download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostProcessor {
    /// Extract the audio track and transcode it
    ExtractAudio { codec: String, quality: u32 },
}

impl PostProcessor {
    fn mp3() -> Self {
        PostProcessor::ExtractAudio {
            codec: "mp3".to_string(),
            quality: MP3_BITRATE_KBPS,
        }
    }
}

/// Engine format expression plus post-processing steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSelection {
    /// Engine format-selection expression
    pub expression: String,
    /// Ordered post-processing steps
    pub post_processors: Vec<PostProcessor>,
}

impl FormatSelection {
    fn plain(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            post_processors: Vec::new(),
        }
    }

    fn mp3() -> Self {
        Self {
            expression: "bestaudio/best".to_string(),
            post_processors: vec![PostProcessor::mp3()],
        }
    }

    /// Build the selection used for single video downloads
    pub fn for_video(format: &str, quality: &str) -> Self {
        let quality = QualitySelector::parse(quality);
        match FormatRequest::parse(format) {
            FormatRequest::FormatId(id) => Self::plain(id),
            FormatRequest::Mp3 => Self::mp3(),
            FormatRequest::Mp4 => match quality {
                QualitySelector::Best => {
                    Self::plain("bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best")
                }
                QualitySelector::Worst => {
                    Self::plain("worstvideo[ext=mp4]+worstaudio[ext=m4a]/worst[ext=mp4]/worst")
                }
                QualitySelector::HeightLessOrEqual(h) => Self::plain(format!(
                    "bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/\
                     best[height<={h}][ext=mp4]/\
                     bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"
                )),
            },
            FormatRequest::Any => match quality {
                QualitySelector::Best => Self::plain("best"),
                QualitySelector::Worst => Self::plain("worst"),
                QualitySelector::HeightLessOrEqual(h) => Self::plain(format!(
                    "bestvideo[height<={h}]+bestaudio/best[height<={h}]/bestvideo+bestaudio/best"
                )),
            },
        }
    }

    /// Build the selection used for playlist downloads
    ///
    /// Explicit format identifiers are not special-cased for playlists and
    /// fall through to the generic container rules.
    pub fn for_playlist(format: &str, quality: &str) -> Self {
        let quality = QualitySelector::parse(quality);
        match format {
            "mp3" => Self::mp3(),
            "mp4" => match quality {
                QualitySelector::Best => Self::plain("best[ext=mp4]/best"),
                QualitySelector::Worst => Self::plain("worst[ext=mp4]/worst"),
                QualitySelector::HeightLessOrEqual(h) => Self::plain(format!(
                    "best[height<={h}][ext=mp4]/best[height<={h}]/best[ext=mp4]/best"
                )),
            },
            _ => match quality {
                QualitySelector::Best => Self::plain("best"),
                QualitySelector::Worst => Self::plain("worst"),
                QualitySelector::HeightLessOrEqual(h) => {
                    Self::plain(format!("best[height<={h}]/best"))
                }
            },
        }
    }
}

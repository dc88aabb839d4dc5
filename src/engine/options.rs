//! Per-request engine options

use crate::core::format::{FormatSelection, PostProcessor};
use std::path::{Path, PathBuf};

/// Output template for single video downloads, relative to the storage root
pub const VIDEO_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";
/// Output template for playlist entries, relative to the storage root
pub const PLAYLIST_OUTPUT_TEMPLATE: &str = "%(playlist)s/%(playlist_index)s - %(title)s.%(ext)s";

/// Immutable option set handed to the engine for a single call
///
/// Built from [`EngineOptions::base`] and narrowed with the `with_*`
/// methods; every request gets its own value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Output path template
    pub output_template: PathBuf,
    /// Restrict output filenames to ASCII without spaces
    pub restrict_filenames: bool,
    /// Download only the video when a URL names both a video and a playlist
    pub no_playlist: bool,
    /// Format selection expression
    pub format: Option<String>,
    /// Post-processing steps
    pub post_processors: Vec<PostProcessor>,
    /// Playlist slice, e.g. "2:4" or "3:"
    pub playlist_items: Option<String>,
}

impl EngineOptions {
    /// Base template: single-video output under `root`
    pub fn base(root: &Path) -> Self {
        Self {
            output_template: root.join(VIDEO_OUTPUT_TEMPLATE),
            restrict_filenames: true,
            no_playlist: true,
            format: None,
            post_processors: Vec::new(),
            playlist_items: None,
        }
    }

    /// Apply a format selection
    pub fn with_selection(mut self, selection: FormatSelection) -> Self {
        self.format = Some(selection.expression);
        self.post_processors = selection.post_processors;
        self
    }

    /// Download a slice of a playlist into a per-playlist subdirectory of `root`
    pub fn with_playlist_items(mut self, root: &Path, items: impl Into<String>) -> Self {
        self.output_template = root.join(PLAYLIST_OUTPUT_TEMPLATE);
        self.playlist_items = Some(items.into());
        self.no_playlist = false;
        self
    }
}

/// Build the engine playlist slice for a 1-based inclusive range
pub fn playlist_range(start: u32, end: Option<u32>) -> String {
    match end {
        Some(end) => format!("{}:{}", start, end),
        None => format!("{}:", start),
    }
}

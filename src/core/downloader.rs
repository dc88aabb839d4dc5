//! Main downloader implementation

use crate::core::format::{FormatRequest, FormatSelection};
use crate::core::VideoInfo;
use crate::engine::{playlist_range, EngineOptions, Extractor};
use crate::error::{EngineOperation, VidserveError};
use crate::utils::normalize_url;
use crate::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main downloader configuration
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Directory the engine writes into
    pub output_path: PathBuf,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("downloads"),
        }
    }
}

/// Outcome of a single video download
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResult {
    pub success: bool,
    pub file_path: PathBuf,
    pub file_size: u64,
    pub title: String,
    /// Duration in seconds
    pub duration: u64,
}

/// One located file of a playlist download
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistFile {
    pub title: String,
    pub file_path: PathBuf,
    pub file_size: u64,
}

/// Outcome of a playlist download
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResult {
    pub success: bool,
    pub playlist_title: String,
    pub downloaded_count: usize,
    pub files: Vec<PlaylistFile>,
    pub total_size: u64,
}

/// Drives the extraction engine and locates what it produced
#[derive(Clone)]
pub struct Downloader {
    options: DownloadOptions,
    engine: Arc<dyn Extractor>,
}

impl Downloader {
    /// Create a new downloader around an engine
    pub fn new(engine: Arc<dyn Extractor>) -> Self {
        Self {
            options: DownloadOptions::default(),
            engine,
        }
    }

    /// Set output directory
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.output_path = path.into();
        self
    }

    /// Output directory
    pub fn output_path(&self) -> &Path {
        &self.options.output_path
    }

    fn base_options(&self) -> EngineOptions {
        EngineOptions::base(&self.options.output_path)
    }

    /// Get video metadata without downloading
    pub async fn video_info(&self, video_url: &str) -> Result<VideoInfo> {
        validate_url(video_url)?;
        let url = normalize_url(video_url);
        info!("Fetching info for {} via {}", url, self.engine.name());

        self.engine
            .extract_info(&url, &self.base_options(), false)
            .await
            .map_err(|e| e.during(EngineOperation::Info))
    }

    /// Download a single video
    pub async fn download(
        &self,
        video_url: &str,
        format: &str,
        quality: &str,
    ) -> Result<DownloadResult> {
        validate_url(video_url)?;
        let url = normalize_url(video_url);
        let selection = FormatSelection::for_video(format, quality);
        debug!("Format expression for {}: {}", url, selection.expression);

        let options = self.base_options().with_selection(selection);
        let info = self
            .engine
            .extract_info(&url, &options, true)
            .await
            .map_err(|e| e.during(EngineOperation::Download))?;

        let request = FormatRequest::parse(format);
        let Some(file_path) = predicted_path(&info, &request) else {
            warn!("{} reported success without an output file", self.engine.name());
            return Err(VidserveError::DownloadIntegrity(self.options.output_path.clone()));
        };

        let file_size = match file_size(&file_path).await {
            Some(size) => size,
            None => {
                warn!("Engine reported success but {} is missing", file_path.display());
                return Err(VidserveError::DownloadIntegrity(file_path));
            }
        };

        info!("Downloaded {} ({} bytes)", file_path.display(), file_size);
        Ok(DownloadResult {
            success: true,
            file_path,
            file_size,
            title: info.title_or("Unknown"),
            duration: info.duration_secs(),
        })
    }

    /// Download a slice of a playlist
    ///
    /// Entries whose file cannot be found after the engine returns are
    /// skipped; an empty result is not an error.
    pub async fn download_playlist(
        &self,
        playlist_url: &str,
        format: &str,
        quality: &str,
        start_index: u32,
        end_index: Option<u32>,
    ) -> Result<PlaylistResult> {
        validate_url(playlist_url)?;
        validate_range(start_index, end_index)?;
        let url = normalize_url(playlist_url);
        let items = playlist_range(start_index, end_index);
        let selection = FormatSelection::for_playlist(format, quality);
        info!("Downloading playlist {} items {}", url, items);

        let options = self
            .base_options()
            .with_selection(selection)
            .with_playlist_items(&self.options.output_path, items);
        let info = self
            .engine
            .extract_info(&url, &options, true)
            .await
            .map_err(|e| e.during(EngineOperation::Playlist))?;

        let request = FormatRequest::parse(format);
        let mut files = Vec::new();
        for entry in info.playlist_entries() {
            let Some(path) = predicted_path(entry, &request) else {
                continue;
            };
            match file_size(&path).await {
                Some(size) => files.push(PlaylistFile {
                    title: entry.title_or("Unknown"),
                    file_path: path,
                    file_size: size,
                }),
                None => debug!("Skipping missing playlist file {}", path.display()),
            }
        }

        let total_size = files.iter().map(|f| f.file_size).sum();
        info!("Playlist finished: {} files, {} bytes", files.len(), total_size);
        Ok(PlaylistResult {
            success: true,
            playlist_title: info.title_or("Unknown Playlist"),
            downloaded_count: files.len(),
            files,
            total_size,
        })
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(VidserveError::Validation("URL must not be empty".to_string()));
    }
    Ok(())
}

fn validate_range(start: u32, end: Option<u32>) -> Result<()> {
    if start < 1 {
        return Err(VidserveError::Validation(
            "start_index must be at least 1".to_string(),
        ));
    }
    if let Some(end) = end {
        if end < start {
            return Err(VidserveError::Validation(format!(
                "end_index ({}) must not be lower than start_index ({})",
                end, start
            )));
        }
    }
    Ok(())
}

/// Path the engine wrote to, accounting for post-processing that changes the
/// container after the engine predicted the filename
fn predicted_path(info: &VideoInfo, request: &FormatRequest) -> Option<PathBuf> {
    let path = PathBuf::from(info.filename.as_deref()?);
    Some(match request.forced_extension() {
        Some(ext) => path.with_extension(ext),
        None => path,
    })
}

async fn file_size(path: &Path) -> Option<u64> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Some(meta.len()),
        _ => None,
    }
}

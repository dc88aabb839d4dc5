//! Request and response bodies

use crate::core::{FormatBuckets, FormatSummary, PlaylistResult, VideoInfo};
use crate::storage::StoredFile;
use crate::utils::download_url;
use serde::{Deserialize, Serialize};

/// Body of `POST /video/info` and `POST /video/download`
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    /// best, worst, mp4, mp3, ... or an engine format id
    #[serde(default)]
    pub format: Option<String>,
    /// best, worst, or a height such as 1080p or 720p
    #[serde(default)]
    pub quality: Option<String>,
}

impl DownloadRequest {
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("best")
    }

    pub fn quality(&self) -> &str {
        self.quality.as_deref().unwrap_or("best")
    }
}

/// Body of `POST /playlist/download`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistDownloadRequest {
    #[serde(flatten)]
    pub video: DownloadRequest,
    /// 1-based index of the first item
    #[serde(default)]
    pub start_index: Option<u32>,
    /// 1-based index of the last item, inclusive
    #[serde(default)]
    pub end_index: Option<u32>,
}

impl PlaylistDownloadRequest {
    pub fn start_index(&self) -> u32 {
        self.start_index.unwrap_or(1)
    }
}

#[derive(Debug, Serialize)]
pub struct VideoInfoResponse {
    pub id: String,
    pub title: String,
    pub duration: u64,
    pub view_count: u64,
    pub upload_date: String,
    pub uploader: String,
    pub description: String,
    pub thumbnail: String,
    pub formats: Vec<FormatSummary>,
    pub available_qualities: Vec<String>,
    pub combined_formats: Vec<FormatSummary>,
    pub video_formats: Vec<FormatSummary>,
    pub audio_formats: Vec<FormatSummary>,
}

impl From<VideoInfo> for VideoInfoResponse {
    fn from(info: VideoInfo) -> Self {
        let buckets = FormatBuckets::from_formats(&info.formats);
        Self {
            description: info.short_description(),
            duration: info.duration_secs(),
            title: info.title_or("Unknown"),
            id: info.id.unwrap_or_default(),
            view_count: info.view_count.unwrap_or(0),
            upload_date: info.upload_date.unwrap_or_default(),
            uploader: info.uploader.unwrap_or_else(|| "Unknown".to_string()),
            thumbnail: info.thumbnail.unwrap_or_default(),
            formats: buckets.combined.clone(),
            available_qualities: buckets.available_qualities,
            combined_formats: buckets.combined,
            video_formats: buckets.video_only,
            audio_formats: buckets.audio_only,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub message: String,
    pub file_path: Option<String>,
    pub file_size: Option<u64>,
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistFileResponse {
    pub title: String,
    pub download_url: String,
    pub file_size: u64,
}

#[derive(Debug, Serialize)]
pub struct PlaylistDownloadResponse {
    pub success: bool,
    pub message: String,
    pub playlist_title: String,
    pub downloaded_count: usize,
    pub total_size: u64,
    pub files: Vec<PlaylistFileResponse>,
}

impl From<PlaylistResult> for PlaylistDownloadResponse {
    fn from(result: PlaylistResult) -> Self {
        Self {
            success: result.success,
            message: format!(
                "Playlist '{}' downloaded successfully",
                result.playlist_title
            ),
            downloaded_count: result.downloaded_count,
            total_size: result.total_size,
            files: result
                .files
                .iter()
                .map(|f| PlaylistFileResponse {
                    title: f.title.clone(),
                    download_url: download_url(&f.file_path),
                    file_size: f.file_size,
                })
                .collect(),
            playlist_title: result.playlist_title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub total_files: usize,
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlaylistFile;
    use std::path::PathBuf;

    #[test]
    fn test_request_defaults() {
        let req: DownloadRequest =
            serde_json::from_str(r#"{"url": "https://youtu.be/abc"}"#).unwrap();
        assert_eq!(req.format(), "best");
        assert_eq!(req.quality(), "best");

        let req: DownloadRequest = serde_json::from_str(
            r#"{"url": "https://youtu.be/abc", "format": "mp4", "quality": null}"#,
        )
        .unwrap();
        assert_eq!(req.format(), "mp4");
        assert_eq!(req.quality(), "best");
    }

    #[test]
    fn test_playlist_request() {
        let req: PlaylistDownloadRequest = serde_json::from_str(
            r#"{"url": "https://www.youtube.com/playlist?list=PLx", "quality": "720p", "end_index": 4}"#,
        )
        .unwrap();
        assert_eq!(req.video.quality(), "720p");
        assert_eq!(req.start_index(), 1);
        assert_eq!(req.end_index, Some(4));
    }

    #[test]
    fn test_playlist_response_urls() {
        let result = PlaylistResult {
            success: true,
            playlist_title: "Mix".to_string(),
            downloaded_count: 1,
            files: vec![PlaylistFile {
                title: "a".to_string(),
                file_path: PathBuf::from("downloads/Mix/1 - a.mp4"),
                file_size: 10,
            }],
            total_size: 10,
        };
        let response = PlaylistDownloadResponse::from(result);
        assert_eq!(response.message, "Playlist 'Mix' downloaded successfully");
        assert_eq!(response.files[0].download_url, "/download/1 - a.mp4");
    }

    #[test]
    fn test_video_info_response() {
        let info: VideoInfo = serde_json::from_str(
            r#"{"id": "abc", "title": "T", "duration": 10, "formats": [
                {"format_id": "18", "height": 360, "vcodec": "avc1", "acodec": "mp4a"}
            ]}"#,
        )
        .unwrap();
        let response = VideoInfoResponse::from(info);
        assert_eq!(response.id, "abc");
        assert_eq!(response.uploader, "Unknown");
        assert_eq!(response.formats, response.combined_formats);
        assert_eq!(response.available_qualities, vec!["360p"]);
    }
}

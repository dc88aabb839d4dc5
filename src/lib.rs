//! # vidserve - video download HTTP API
//!
//! Thin HTTP service in front of an external extraction engine (yt-dlp).
//!
//! ## Features
//!
//! - Canonicalization of short, mobile, embed and legacy video links
//! - Format/quality requests translated into engine format expressions
//! - Single video and playlist-range downloads
//! - Listing, serving and deleting stored files, with delayed cleanup
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidserve::{Downloader, YtDlp};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = Downloader::new(Arc::new(YtDlp::new()))
//!         .with_output_path("./downloads");
//!
//!     let result = downloader
//!         .download("https://youtu.be/VIDEO_ID", "mp4", "720p")
//!         .await?;
//!     println!("Downloaded: {}", result.file_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod storage;
pub mod utils;

// Re-export main types
pub use crate::core::{
    DownloadResult, Downloader, FormatSelection, PlaylistResult, PostProcessor, VideoInfo,
};
pub use config::ServerConfig;
pub use engine::{EngineOptions, Extractor, YtDlp};
pub use error::VidserveError;
pub use storage::{FileStore, StoredFile};

/// Result type alias for vidserve operations
pub type Result<T> = std::result::Result<T, VidserveError>;

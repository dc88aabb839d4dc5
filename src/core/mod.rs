//! Core functionality for vidserve

pub mod downloader;
pub mod format;
pub mod video_info;

pub use downloader::*;
pub use format::*;
pub use video_info::*;

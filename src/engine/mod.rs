//! Extraction engine adapter
//!
//! The engine resolves metadata, negotiates formats and performs the actual
//! transfer and post-processing. This module only describes what to ask for
//! ([`EngineOptions`]) and the seam used to ask it ([`Extractor`]).

pub mod options;
pub mod ytdlp;

pub use options::*;
pub use ytdlp::*;

use crate::core::VideoInfo;
use crate::Result;
use async_trait::async_trait;

/// Trait for extraction engines
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the engine (for logging)
    fn name(&self) -> &'static str;

    /// Resolve metadata for `url`, downloading the media as well when
    /// `download` is set.
    ///
    /// The returned record (and each playlist entry) carries the output path
    /// the engine chose, before any post-processing changed the extension.
    /// Failures are already classified into the crate error taxonomy.
    async fn extract_info(
        &self,
        url: &str,
        options: &EngineOptions,
        download: bool,
    ) -> Result<VideoInfo>;
}

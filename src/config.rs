//! Server configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default delay before a downloaded single video is removed
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_secs(3600);

/// Runtime configuration for the HTTP service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Storage root for downloads
    pub downloads_dir: PathBuf,
    /// Delay before single video downloads are deleted
    pub cleanup_delay: Duration,
    /// yt-dlp executable
    pub ytdlp_path: String,
    /// Upper bound for a single engine call
    pub engine_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            downloads_dir: PathBuf::from("downloads"),
            cleanup_delay: DEFAULT_CLEANUP_DELAY,
            ytdlp_path: "yt-dlp".to_string(),
            engine_timeout: None,
        }
    }
}

impl ServerConfig {
    /// Address to listen on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

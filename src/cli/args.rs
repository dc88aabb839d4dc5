//! Command line argument parsing

use crate::config::ServerConfig;
use clap::Parser;
use std::path::PathBuf;

/// vidserve - HTTP API for fetching video metadata and downloads
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "VIDSERVE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "VIDSERVE_PORT", default_value = "8000")]
    pub port: u16,

    /// Directory downloads are written to and served from
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "VIDSERVE_DOWNLOADS_DIR",
        default_value = "downloads"
    )]
    pub downloads_dir: PathBuf,

    /// Delay before a downloaded video is deleted (e.g. 1h, 30m)
    #[arg(long, value_name = "DURATION", env = "VIDSERVE_CLEANUP_DELAY", default_value = "1h")]
    pub cleanup_delay: humantime::Duration,

    /// Path to the yt-dlp executable
    #[arg(long, value_name = "PATH", env = "VIDSERVE_YTDLP", default_value = "yt-dlp")]
    pub ytdlp_path: String,

    /// Kill an engine call that runs longer than this (e.g. 10m)
    #[arg(long, value_name = "DURATION", env = "VIDSERVE_ENGINE_TIMEOUT")]
    pub engine_timeout: Option<humantime::Duration>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Convert into the server configuration
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            downloads_dir: self.downloads_dir,
            cleanup_delay: self.cleanup_delay.into(),
            ytdlp_path: self.ytdlp_path,
            engine_timeout: self.engine_timeout.map(Into::into),
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

impl VerbosityLevel {
    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "info,tower_http=info",
            VerbosityLevel::Verbose => "debug,tower_http=debug",
        }
    }
}

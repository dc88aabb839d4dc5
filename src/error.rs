//! Error types for vidserve

use regex::RegexSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

/// Remediation text attached to authentication / bot-check failures
pub const AUTH_CHALLENGE_GUIDANCE: &str = "YouTube is requiring authentication to access this video. \
This may happen if YouTube suspects automated traffic or the video is age-restricted. \
Try again later, or use yt-dlp with cookies as described at: \
https://github.com/yt-dlp/yt-dlp/wiki/FAQ#how-do-i-pass-cookies-to-yt-dlp";

static AUTH_CHALLENGE_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"Sign in to confirm you.re not a bot",
        r"(?i)not a bot",
        r"(?i)cookies",
        r"(?i)authentication",
    ])
    .expect("auth challenge patterns are valid")
});

/// Engine call an extraction failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOperation {
    Info,
    Download,
    Playlist,
}

impl fmt::Display for EngineOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EngineOperation::Info => "Failed to extract video info",
            EngineOperation::Download => "Download failed",
            EngineOperation::Playlist => "Playlist download failed",
        })
    }
}

/// Main error type for vidserve operations
#[derive(Debug, Error)]
pub enum VidserveError {
    #[error("{0}")]
    Validation(String),

    #[error("{operation}: {message}")]
    Extraction {
        operation: EngineOperation,
        message: String,
    },

    #[error("{}", AUTH_CHALLENGE_GUIDANCE)]
    AuthChallenge(String),

    #[error("Download completed but file not found: {}", .0.display())]
    DownloadIntegrity(PathBuf),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to delete file: {0}")]
    Deletion(String),

    #[error("Extraction engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl VidserveError {
    /// Classify a raw engine failure message into the error taxonomy
    pub fn classify_engine_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if AUTH_CHALLENGE_PATTERNS.is_match(&message) {
            VidserveError::AuthChallenge(message)
        } else {
            VidserveError::Extraction {
                operation: EngineOperation::Info,
                message,
            }
        }
    }

    /// Extraction failure, attributed to an info lookup until `during` relabels it
    pub fn extraction(message: impl Into<String>) -> Self {
        VidserveError::Extraction {
            operation: EngineOperation::Info,
            message: message.into(),
        }
    }

    /// Attribute an extraction failure to the operation that ran the engine
    pub fn during(self, operation: EngineOperation) -> Self {
        match self {
            VidserveError::Extraction { message, .. } => {
                VidserveError::Extraction { operation, message }
            }
            other => other,
        }
    }

    /// Check if error is caused by the client request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VidserveError::Validation(_)
                | VidserveError::Extraction { .. }
                | VidserveError::AuthChallenge(_)
                | VidserveError::NotFound(_)
        )
    }
}

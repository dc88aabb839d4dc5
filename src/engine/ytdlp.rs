//! yt-dlp engine, driven as a child process

use super::{EngineOptions, Extractor};
use crate::core::format::PostProcessor;
use crate::core::VideoInfo;
use crate::error::VidserveError;
use crate::Result;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Extraction engine backed by the `yt-dlp` binary
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
    timeout: Option<Duration>,
}

impl YtDlp {
    /// Create an engine using `yt-dlp` from `PATH`
    pub fn new() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            timeout: None,
        }
    }

    /// Use a specific yt-dlp executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Kill the engine process when a call takes longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build command line arguments for a call
    pub fn build_args(url: &str, options: &EngineOptions, download: bool) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--no-progress".to_string(),
            "--output".to_string(),
            options.output_template.to_string_lossy().into_owned(),
        ];

        if download {
            args.push("--no-simulate".to_string());
        }
        if options.restrict_filenames {
            args.push("--restrict-filenames".to_string());
        }
        args.push(if options.no_playlist {
            "--no-playlist".to_string()
        } else {
            "--yes-playlist".to_string()
        });
        if let Some(format) = &options.format {
            args.push("--format".to_string());
            args.push(format.clone());
        }
        if let Some(items) = &options.playlist_items {
            args.push("--playlist-items".to_string());
            args.push(items.clone());
        }
        for step in &options.post_processors {
            match step {
                PostProcessor::ExtractAudio { codec, quality } => {
                    args.push("--extract-audio".to_string());
                    args.push("--audio-format".to_string());
                    args.push(codec.clone());
                    args.push("--audio-quality".to_string());
                    args.push(format!("{}K", quality));
                }
            }
        }

        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<std::process::Output> {
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                VidserveError::EngineUnavailable(format!("failed to start {}: {}", self.program, e))
            })?;

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    warn!("{} did not finish within {:?}", self.program, limit);
                    VidserveError::extraction(format!(
                        "{} timed out after {}",
                        self.program,
                        humantime::format_duration(limit)
                    ))
                })?
                .map_err(VidserveError::from),
            None => child.wait_with_output().await.map_err(VidserveError::from),
        }
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the meaningful part of yt-dlp's stderr
fn failure_message(stderr: &str) -> String {
    let errors: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("ERROR:"))
        .collect();
    if errors.is_empty() {
        stderr.trim().to_string()
    } else {
        errors.join("\n")
    }
}

#[async_trait]
impl Extractor for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract_info(
        &self,
        url: &str,
        options: &EngineOptions,
        download: bool,
    ) -> Result<VideoInfo> {
        let args = Self::build_args(url, options, download);
        debug!("Running {} {:?}", self.program, args);

        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = failure_message(&stderr);
            let message = if message.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                message
            };
            return Err(VidserveError::classify_engine_failure(message));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            VidserveError::extraction(format!("unreadable {} output: {}", self.name(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::FormatSelection;
    use crate::engine::playlist_range;
    use std::path::Path;

    fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_info_args() {
        let options = EngineOptions::base(Path::new("downloads"));
        let args = YtDlp::build_args("https://www.youtube.com/watch?v=abc", &options, false);

        assert!(args.contains(&"--dump-single-json".to_string()));
        assert!(!args.contains(&"--no-simulate".to_string()));
        assert!(args.contains(&"--restrict-filenames".to_string()));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(!args.contains(&"--format".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn test_download_args_mp3() {
        let options = EngineOptions::base(Path::new("downloads"))
            .with_selection(FormatSelection::for_video("mp3", "best"));
        let args = YtDlp::build_args("https://www.youtube.com/watch?v=abc", &options, true);

        assert!(args.contains(&"--no-simulate".to_string()));
        assert_eq!(arg_after(&args, "--format"), Some("bestaudio/best"));
        assert!(args.contains(&"--extract-audio".to_string()));
        assert_eq!(arg_after(&args, "--audio-format"), Some("mp3"));
        assert_eq!(arg_after(&args, "--audio-quality"), Some("192K"));
    }

    #[test]
    fn test_playlist_args() {
        let root = Path::new("downloads");
        let options = EngineOptions::base(root)
            .with_selection(FormatSelection::for_playlist("best", "720p"))
            .with_playlist_items(root, playlist_range(2, Some(4)));
        let args = YtDlp::build_args("https://www.youtube.com/playlist?list=PLx", &options, true);

        assert_eq!(arg_after(&args, "--playlist-items"), Some("2:4"));
        assert_eq!(arg_after(&args, "--format"), Some("best[height<=720]/best"));
        assert!(args.contains(&"--yes-playlist".to_string()));
        assert!(arg_after(&args, "--output")
            .is_some_and(|o| o.ends_with("%(playlist_index)s - %(title)s.%(ext)s")));
    }

    #[test]
    fn test_failure_message() {
        let stderr = "WARNING: something\nERROR: [youtube] abc: Video unavailable\n";
        assert_eq!(failure_message(stderr), "ERROR: [youtube] abc: Video unavailable");
        assert_eq!(failure_message("  plain failure \n"), "plain failure");
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_unavailable() {
        let engine = YtDlp::new().with_program("/nonexistent/yt-dlp-for-tests");
        let options = EngineOptions::base(Path::new("downloads"));
        let err = engine
            .extract_info("https://www.youtube.com/watch?v=abc", &options, false)
            .await
            .unwrap_err();
        assert!(matches!(err, VidserveError::EngineUnavailable(_)));
    }
}

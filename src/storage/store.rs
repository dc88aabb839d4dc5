//! File store: the storage root and everything the engine wrote into it

use crate::error::VidserveError;
use crate::utils::{download_url, is_safe_filename};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// A file found under the storage root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// Bare file name
    pub filename: String,
    /// Path relative to the storage root
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time, when the filesystem reports one
    pub modified: Option<DateTime<Utc>>,
    /// Relative URL the file is served under
    pub download_url: String,
}

/// Storage root manager
///
/// The filesystem is the only source of truth; nothing is indexed in memory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store, creating the root directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!("Storage root ready at {}", root.display());
        Ok(Self { root })
    }

    /// Storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a bare filename to a path under the root
    ///
    /// The root itself is checked first, then every subdirectory. Names are
    /// not unique across playlist directories; the first match wins.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if !is_safe_filename(filename) {
            return Err(VidserveError::Validation(format!(
                "Invalid filename: {}",
                filename
            )));
        }

        let direct = self.root.join(filename);
        if direct.is_file() {
            return Ok(direct);
        }

        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name() == filename)
            .map(|entry| entry.into_path())
            .ok_or_else(|| VidserveError::NotFound(filename.to_string()))
    }

    /// List every file under the root, recursively
    pub fn list(&self) -> Result<Vec<StoredFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                // Removed between the directory read and the stat
                Err(_) => continue,
            };
            let relative = pathdiff::diff_paths(entry.path(), &self.root)
                .unwrap_or_else(|| entry.path().to_path_buf());

            files.push(StoredFile {
                filename: entry.file_name().to_string_lossy().into_owned(),
                path: relative.to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                download_url: download_url(entry.path()),
            });
        }

        Ok(files)
    }

    /// Delete a stored file immediately
    ///
    /// The name is resolved on the blocking pool since it may walk the tree.
    pub async fn delete(&self, filename: &str) -> Result<PathBuf> {
        let store = self.clone();
        let name = filename.to_string();
        let path = tokio::task::spawn_blocking(move || store.resolve(&name))
            .await
            .map_err(|e| VidserveError::IoError(std::io::Error::other(e)))??;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted {}", path.display());
                Ok(path)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(VidserveError::NotFound(filename.to_string()))
            }
            Err(e) => Err(VidserveError::Deletion(e.to_string())),
        }
    }

    /// Delete `path` once `delay` has elapsed
    ///
    /// Fire and forget: no handle is kept, so the deletion cannot be
    /// cancelled, and failures are only logged.
    pub fn schedule_delete(&self, path: PathBuf, delay: Duration) {
        debug!(
            "Scheduling cleanup of {} in {}",
            path.display(),
            humantime::format_duration(delay)
        );
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => info!("Cleaned up file: {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Cleanup skipped, {} already gone", path.display())
                }
                Err(e) => error!("Failed to clean up file {}: {}", path.display(), e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_with_files() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("downloads")).unwrap();
        fs::write(store.root().join("single.mp4"), b"12345").unwrap();
        let list_dir = store.root().join("My_List");
        fs::create_dir(&list_dir).unwrap();
        fs::write(list_dir.join("1 - first.mp4"), b"abc").unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("downloads");
        let store = FileStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_resolve_direct_and_nested() {
        let (_dir, store) = store_with_files();
        assert_eq!(
            store.resolve("single.mp4").unwrap(),
            store.root().join("single.mp4")
        );
        assert_eq!(
            store.resolve("1 - first.mp4").unwrap(),
            store.root().join("My_List").join("1 - first.mp4")
        );
    }

    #[test]
    fn test_resolve_errors() {
        let (_dir, store) = store_with_files();
        assert!(matches!(
            store.resolve("missing.mp4"),
            Err(VidserveError::NotFound(_))
        ));
        assert!(matches!(
            store.resolve("My_List"),
            Err(VidserveError::NotFound(_))
        ));
        assert!(matches!(
            store.resolve("../secret"),
            Err(VidserveError::Validation(_))
        ));
    }

    #[test]
    fn test_list_recursive() {
        let (_dir, store) = store_with_files();
        let files = store.list().unwrap();
        assert_eq!(files.len(), 2);

        let nested = files.iter().find(|f| f.filename == "1 - first.mp4").unwrap();
        assert_eq!(
            Path::new(&nested.path),
            Path::new("My_List").join("1 - first.mp4")
        );
        assert_eq!(nested.size, 3);
        assert_eq!(nested.download_url, "/download/1 - first.mp4");
        assert!(nested.modified.is_some());

        let single = files.iter().find(|f| f.filename == "single.mp4").unwrap();
        assert_eq!(single.path, "single.mp4");
        assert_eq!(single.size, 5);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, store) = store_with_files();
        let removed = store.delete("1 - first.mp4").await.unwrap();
        assert!(!removed.exists());

        let files = store.list().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "single.mp4");

        assert!(matches!(
            store.delete("1 - first.mp4").await,
            Err(VidserveError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_delete_nested_on_single_threaded_runtime() {
        let (_dir, store) = store_with_files();
        let removed = store.delete("1 - first.mp4").await.unwrap();
        assert_eq!(removed, store.root().join("My_List").join("1 - first.mp4"));
        assert!(matches!(
            store.delete("../single.mp4").await,
            Err(VidserveError::Validation(_))
        ));
        assert!(store.root().join("single.mp4").exists());
    }

    #[tokio::test]
    async fn test_schedule_delete() {
        let (_dir, store) = store_with_files();
        let path = store.root().join("single.mp4");

        store.schedule_delete(path.clone(), Duration::from_millis(20));
        assert!(path.exists());

        for _ in 0..100 {
            if !path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_schedule_delete_of_missing_file_is_harmless() {
        let (_dir, store) = store_with_files();
        store.schedule_delete(store.root().join("never-existed.mp4"), Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.list().unwrap().len(), 2);
    }
}

//! Route handlers

use super::dto::{
    DeleteResponse, DownloadRequest, DownloadResponse, FilesResponse, PlaylistDownloadRequest,
    PlaylistDownloadResponse, VideoInfoResponse,
};
use super::error::ApiError;
use super::AppState;
use crate::error::VidserveError;
use crate::storage::FileStore;
use crate::utils::{download_url, is_playlist_url};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::info;

type ApiResult<T> = Result<T, ApiError>;

/// JSON body whose rejection is reported through `ApiError`
type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Run a blocking filesystem walk off the async workers
async fn with_store<T, F>(store: &FileStore, f: F) -> Result<T, VidserveError>
where
    T: Send + 'static,
    F: FnOnce(FileStore) -> Result<T, VidserveError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(store))
        .await
        .map_err(|e| VidserveError::IoError(std::io::Error::other(e)))?
}

/// GET /
pub(crate) async fn root() -> Json<Value> {
    Json(json!({
        "message": "YouTube Downloader API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /": "This endpoint",
            "GET /health": "Health check",
            "POST /video/info": "Get video information",
            "POST /video/download": "Download single video",
            "POST /playlist/download": "Download playlist",
            "GET /download/{filename}": "Download file",
            "GET /files": "List downloaded files",
            "DELETE /files/{filename}": "Delete a downloaded file"
        }
    }))
}

/// GET /health
pub(crate) async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "YouTube Downloader API is running"
    }))
}

/// POST /video/info
pub(crate) async fn video_info(
    State(state): State<Arc<AppState>>,
    body: JsonBody<DownloadRequest>,
) -> ApiResult<Json<VideoInfoResponse>> {
    let Json(request) = body?;
    let info = state.downloader.video_info(&request.url).await?;
    Ok(Json(VideoInfoResponse::from(info)))
}

/// POST /video/download
pub(crate) async fn download_video(
    State(state): State<Arc<AppState>>,
    body: JsonBody<DownloadRequest>,
) -> ApiResult<Json<DownloadResponse>> {
    let Json(request) = body?;
    if is_playlist_url(&request.url) {
        return Err(ApiError::bad_request(
            "Playlist URL detected. Use /playlist/download endpoint for playlists.",
        ));
    }

    let result = state
        .downloader
        .download(&request.url, request.format(), request.quality())
        .await?;

    state
        .store
        .schedule_delete(result.file_path.clone(), state.cleanup_delay);

    Ok(Json(DownloadResponse {
        success: true,
        message: format!("Video '{}' downloaded successfully.", result.title),
        download_url: Some(download_url(&result.file_path)),
        file_path: Some(result.file_path.to_string_lossy().into_owned()),
        file_size: Some(result.file_size),
    }))
}

/// POST /playlist/download
pub(crate) async fn download_playlist(
    State(state): State<Arc<AppState>>,
    body: JsonBody<PlaylistDownloadRequest>,
) -> ApiResult<Json<PlaylistDownloadResponse>> {
    let Json(request) = body?;
    let result = state
        .downloader
        .download_playlist(
            &request.video.url,
            request.video.format(),
            request.video.quality(),
            request.start_index(),
            request.end_index,
        )
        .await?;
    Ok(Json(PlaylistDownloadResponse::from(result)))
}

/// GET /download/{filename}
pub(crate) async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let name = filename.clone();
    let path = with_store(&state.store, move |store| store.resolve(&name)).await?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| VidserveError::NotFound(filename.clone()))?;
    let length = file.metadata().await.map_err(VidserveError::from)?.len();
    info!("Serving {} ({} bytes)", path.display(), length);

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        filename.replace('"', "")
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_LENGTH, HeaderValue::from(length)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

/// GET /files
pub(crate) async fn list_files(State(state): State<Arc<AppState>>) -> ApiResult<Json<FilesResponse>> {
    let files = with_store(&state.store, |store| store.list()).await?;
    Ok(Json(FilesResponse {
        total_files: files.len(),
        files,
    }))
}

/// DELETE /files/{filename}
pub(crate) async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.store.delete(&filename).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: format!("File {} deleted successfully", filename),
    }))
}

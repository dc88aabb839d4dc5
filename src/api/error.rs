//! HTTP error translation

use crate::error::VidserveError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Error returned by handlers: a status code plus a human readable detail
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }
}

/// Status code for each error kind
pub fn status_for(err: &VidserveError) -> StatusCode {
    match err {
        VidserveError::Validation(_)
        | VidserveError::Extraction { .. }
        | VidserveError::AuthChallenge(_) => StatusCode::BAD_REQUEST,
        VidserveError::NotFound(_) => StatusCode::NOT_FOUND,
        VidserveError::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        VidserveError::DownloadIntegrity(_)
        | VidserveError::Deletion(_)
        | VidserveError::IoError(_)
        | VidserveError::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<VidserveError> for ApiError {
    fn from(err: VidserveError) -> Self {
        let status = status_for(&err);
        let detail = match &err {
            VidserveError::NotFound(_) => "File not found".to_string(),
            other => other.to_string(),
        };
        if err.is_client_error() {
            warn!("Request rejected: {}", err);
        } else {
            error!("Request failed: {}", err);
        }
        Self::new(status, detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        VidserveError::Validation(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (VidserveError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (VidserveError::extraction("x"), StatusCode::BAD_REQUEST),
            (VidserveError::AuthChallenge("x".into()), StatusCode::BAD_REQUEST),
            (VidserveError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                VidserveError::DownloadIntegrity(PathBuf::from("a.mp4")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (VidserveError::Deletion("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                VidserveError::EngineUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{:?}", err);
        }
    }

    #[test]
    fn test_auth_challenge_detail_carries_guidance() {
        let api: ApiError = VidserveError::AuthChallenge("Sign in".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.detail.contains("yt-dlp with cookies"));
    }

    #[test]
    fn test_not_found_detail() {
        let api: ApiError = VidserveError::NotFound("x.mp4".into()).into();
        assert_eq!(api.detail, "File not found");
    }
}

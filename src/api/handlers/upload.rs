//! File upload endpoint

use actix_multipart::{Multipart, MultipartError};
use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use bytes::BytesMut;
use futures::TryStreamExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::AppState;
use crate::api::handlers::{internal_error, ErrorResponse};
use crate::domain::UploadRequest;

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Multipart form accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Response for a stored upload
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub key: String,
    pub url: String,
}

/// Reasons an upload is refused before it reaches the bucket
#[derive(Error, Debug)]
pub enum UploadRejection {
    #[error("No file uploaded")]
    MissingFile,

    #[error("File too large")]
    TooLarge { limit: usize },

    #[error("Invalid multipart payload")]
    Malformed(#[from] MultipartError),
}

impl ResponseError for UploadRejection {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadRejection::MissingFile | UploadRejection::Malformed(_) => StatusCode::BAD_REQUEST,
            UploadRejection::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// POST /api/upload - Store a single file in the bucket
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "objects",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file in the request", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Bucket write failed", body = ErrorResponse)
    )
)]
pub async fn upload_file(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let request = match read_file_field(payload, state.settings.upload.max_file_size).await {
        Ok(request) => request,
        Err(rejection) => {
            match &rejection {
                UploadRejection::TooLarge { limit } => {
                    warn!(limit = *limit, "Upload rejected: file exceeds size limit");
                }
                other => warn!(error = %other, "Upload rejected"),
            }
            return rejection.error_response();
        }
    };

    info!(
        name = %request.original_name,
        content_type = %request.mime_type,
        size = request.size(),
        "Processing upload"
    );

    match state.gallery.upload(request).await {
        Ok(stored) => HttpResponse::Ok().json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            key: stored.key,
            url: stored.url,
        }),
        Err(e) => {
            error!(error = %e, "Upload failed");
            internal_error("Failed to upload file")
        }
    }
}

/// Buffer the first `file` field with a filename; other fields are drained
async fn read_file_field(
    mut payload: Multipart,
    max_size: usize,
) -> Result<UploadRequest, UploadRejection> {
    while let Some(mut field) = payload.try_next().await? {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(String::from);

        let filename = match filename {
            Some(name) if field.name() == Some(FILE_FIELD) => name,
            _ => {
                while field.try_next().await?.is_some() {}
                continue;
            }
        };

        let mime_type = field.content_type().map(|m| m.to_string());

        let mut data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if data.len() + chunk.len() > max_size {
                return Err(UploadRejection::TooLarge { limit: max_size });
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(UploadRequest::new(filename, mime_type, data.freeze()));
    }

    Err(UploadRejection::MissingFile)
}

//! Bulk CSV upload

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use bizcard_common::reconcile;
use serde::Serialize;
use tracing::info;

use super::AuthContext;
use crate::{ApiError, ApiResult, AppState};

/// Multipart field carrying the spreadsheet export
const FILE_FIELD: &str = "file";

/// Import counts returned to the uploader
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub inserted: u64,
    pub updated: u64,
}

fn upload_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Upload exceeds {} bytes", crate::UPLOAD_LIMIT_BYTES))
    } else {
        ApiError::BadRequest(format!("Malformed upload: {}", err))
    }
}

/// POST /upload
///
/// Reconciles the uploaded CSV against the directory in one transaction.
pub async fn upload_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(upload_error)?;
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    };
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }
    if data.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let summary = reconcile::reconcile(&state.db, &data).await?;

    info!(
        session = %auth.session,
        file = %filename,
        inserted = summary.inserted,
        updated = summary.updated,
        "CSV processed"
    );

    Ok(Json(UploadResponse {
        message: "CSV processed".to_string(),
        inserted: summary.inserted,
        updated: summary.updated,
    }))
}

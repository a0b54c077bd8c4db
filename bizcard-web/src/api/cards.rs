//! QR business cards and contact downloads

use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bizcard_common::{archive, db, qr, vcard, Employee};
use serde::Serialize;

use crate::{ApiError, ApiResult, AppState};

/// Display placeholder for missing fields in API responses
pub const NOT_AVAILABLE: &str = "N/A";

/// Employee fields for display plus the card as a data URI
#[derive(Debug, Serialize)]
pub struct QrResponse {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub designation: String,
    pub faculty: String,
    pub school: String,
    /// `data:image/png;base64,...`
    pub qr_code: String,
}

fn display(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

async fn find_employee(state: &AppState, name: &str) -> ApiResult<Employee> {
    db::get_by_name(&state.db, name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Employee not found: {}", name)))
}

/// GET /generate_qr/:name
pub async fn generate_qr(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<QrResponse>> {
    let employee = find_employee(&state, &name).await?;

    let record = vcard::build(&employee);
    let png = tokio::task::spawn_blocking(move || qr::encode(&record))
        .await
        .map_err(|e| ApiError::Internal(format!("QR task failed: {}", e)))??;

    Ok(Json(QrResponse {
        mobile: display(&employee.mobile),
        designation: display(&employee.designation),
        faculty: display(&employee.faculty),
        school: display(&employee.school),
        name: employee.name,
        email: employee.email,
        qr_code: format!("data:image/png;base64,{}", STANDARD.encode(png)),
    }))
}

/// GET /vcard/:name
///
/// Raw contact record as a `.vcf` download.
pub async fn download_vcard(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let employee = find_employee(&state, &name).await?;
    let filename = format!("{}.vcf", vcard::safe_name(&employee.name));

    Ok((
        [
            (CONTENT_TYPE, "text/vcard; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, attachment(&filename)),
        ],
        vcard::build(&employee),
    )
        .into_response())
}

/// GET /download_all_qr
///
/// Zip of every employee's QR card; 404 when the directory is empty.
pub async fn download_all_qr(State(state): State<AppState>) -> ApiResult<Response> {
    let bytes = archive::assemble_all(&state.db).await?;

    Ok((
        [
            (CONTENT_TYPE, "application/zip".to_string()),
            (CONTENT_DISPOSITION, attachment(archive::ARCHIVE_FILENAME)),
        ],
        bytes,
    )
        .into_response())
}

/// `Content-Disposition` value with a header-safe ASCII filename
fn attachment(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_substitutes_missing() {
        assert_eq!(display(&None), "N/A");
        assert_eq!(display(&Some(String::new())), "N/A");
        assert_eq!(display(&Some("Dean".into())), "Dean");
    }

    #[test]
    fn test_attachment_sanitizes() {
        assert_eq!(attachment("Jane_Doe.vcf"), "attachment; filename=\"Jane_Doe.vcf\"");
        assert_eq!(attachment("Zoë \"Q\".vcf"), "attachment; filename=\"Zo___Q_.vcf\"");
    }
}

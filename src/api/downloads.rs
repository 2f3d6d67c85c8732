//! Download and upload endpoints for the binary assets.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::{read_upload, success, ApiResult};
use crate::errors::AppError;
use crate::store::{BundleKind, RULES_FILE};
use crate::AppState;

/// Receipt for a stored rules document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesReceipt {
    pub file_name: String,
    pub size: usize,
}

/// Receipt for a replaced bundle.
#[derive(Debug, Serialize)]
pub struct BundleReceipt {
    pub bundle: BundleKind,
    pub files: usize,
}

/// GET /api/downloads/rules - Download the rules document.
pub async fn download_rules(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = state.assets.rules_document().await?;
    Ok(attachment(bytes, "application/pdf", RULES_FILE))
}

/// PUT /api/admin/rules - Upload the rules document, overwriting any
/// previous one.
pub async fn upload_rules(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<RulesReceipt> {
    let (file_name, bytes) = read_upload(&mut multipart).await?;
    state.assets.put_rules_document(&bytes).await?;

    success(RulesReceipt {
        file_name,
        size: bytes.len(),
    })
}

/// GET /api/downloads/bundles/{kind} - Download a bundle as a zip archive.
pub async fn download_bundle(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Response, AppError> {
    let kind = parse_bundle_kind(&kind)?;
    let bytes = state.assets.bundle_archive(kind).await?;
    let file_name = format!("{}.zip", kind.as_str());
    Ok(attachment(bytes, "application/zip", &file_name))
}

/// PUT /api/admin/bundles/{kind} - Replace a bundle from an uploaded zip
/// archive.
pub async fn upload_bundle(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<BundleReceipt> {
    let kind = parse_bundle_kind(&kind)?;
    let (_, bytes) = read_upload(&mut multipart).await?;
    let files = state.assets.replace_bundle(kind, bytes).await?;

    success(BundleReceipt {
        bundle: kind,
        files,
    })
}

fn parse_bundle_kind(raw: &str) -> Result<BundleKind, AppError> {
    BundleKind::from_str(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown bundle {:?}", raw)))
}

fn attachment(bytes: Vec<u8>, content_type: &str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

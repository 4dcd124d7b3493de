use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::documents::dto::{RecordResponse, UploadResponse};
use crate::documents::services::{store_document, UploadItem};
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::User;

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/docs/upload", post(upload_document))
        .route("/docs/record", post(record_document))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

struct UploadForm {
    file: Option<UploadItem>,
    email: Option<String>,
}

/// Pulls the `file` and `email` parts out of a multipart body. Unknown
/// parts are skipped.
async fn read_upload_form(mut mp: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        file: None,
        email: None,
    };
    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .unwrap_or("document.pdf")
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/pdf".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
                form.file = Some(UploadItem {
                    body,
                    content_type,
                    original_name,
                });
            }
            Some("email") => {
                let email = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
                form.email = Some(email);
            }
            _ => {}
        }
    }
    Ok(form)
}

/// POST /docs/upload (multipart) — upload without touching any user record.
#[instrument(skip(state, mp))]
pub async fn upload_document(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let form = read_upload_form(mp).await?;
    let file = form.file.ok_or_else(|| {
        warn!("upload without file part");
        ApiError::BadRequest("No file uploaded".into())
    })?;

    let download_url = store_document(state.storage.as_ref(), &file)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    info!(%download_url, "document uploaded");
    Ok(Json(UploadResponse {
        message: "Document uploaded successfully!".into(),
        download_url,
    }))
}

/// POST /docs/record (multipart: email + file) — upload, then append the
/// URL to the user's documents.
#[instrument(skip(state, mp))]
pub async fn record_document(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<Json<RecordResponse>, ApiError> {
    let form = read_upload_form(mp).await?;
    record_upload(&state, form.email, form.file).await.map(Json)
}

pub(crate) async fn record_upload(
    state: &AppState,
    email: Option<String>,
    file: Option<UploadItem>,
) -> Result<RecordResponse, ApiError> {
    let email = email.ok_or_else(|| ApiError::BadRequest("No email provided".into()))?;

    // The user lookup comes first: an unknown email never reaches the
    // object store.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "record for unknown email");
            ApiError::NotFound("User not found!".into())
        })?;

    let file = file.ok_or_else(|| {
        warn!(email = %email, "record without file part");
        ApiError::BadRequest("No file uploaded".into())
    })?;

    // Upload, then persist. A fault between the two leaves an orphaned
    // object but no document recorded; re-uploading is safe.
    let download_url = store_document(state.storage.as_ref(), &file)
        .await
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    let user = User::append_document(&state.db, user.id, &download_url).await?;

    info!(user_id = %user.id, %download_url, "document recorded");
    Ok(RecordResponse {
        message: "Document recorded successfully!".into(),
        download_url,
        user,
    })
}

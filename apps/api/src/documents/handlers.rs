//! Axum route handlers for the Documents API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::service::{self, DocumentUpload, DocumentView};
use crate::errors::AppError;
use crate::models::document::DocumentType;
use crate::session::AuthSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document: DocumentView,
    pub documents: Vec<DocumentView>,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::invalid_field("file", "The selected file is too large")
    } else {
        AppError::Validation(err.body_text())
    }
}

/// Reads the `file`, `documentType` and `applicationId` parts.
/// Unknown parts are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<DocumentUpload, AppError> {
    let mut upload = DocumentUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                upload.body = field.bytes().await.map_err(multipart_error)?;
            }
            "documentType" | "document_type" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    let doc_type = raw.parse::<DocumentType>().map_err(|_| {
                        AppError::invalid_field("documentType", format!("Unknown document type '{raw}'"))
                    })?;
                    upload.doc_type = Some(doc_type);
                }
            }
            "applicationId" | "application_id" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    let id = raw.parse::<Uuid>().map_err(|_| {
                        AppError::invalid_field("applicationId", "Not a valid application id")
                    })?;
                    upload.application_id = Some(id);
                }
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Vec<DocumentView>>, AppError> {
    let documents = service::list_documents(
        state.repos.documents.as_ref(),
        state.storage.as_ref(),
        session.user.id,
    )
    .await?;
    Ok(Json(documents))
}

/// POST /api/v1/documents (multipart/form-data)
pub async fn handle_upload_document(
    State(state): State<AppState>,
    session: AuthSession,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let upload = read_upload(multipart).await?;
    let document = service::upload_document(
        state.repos.documents.as_ref(),
        state.repos.applications.as_ref(),
        state.storage.as_ref(),
        session.user.id,
        upload,
        state.config.max_upload_bytes,
        Utc::now(),
    )
    .await?;

    let documents = service::list_documents(
        state.repos.documents.as_ref(),
        state.storage.as_ref(),
        session.user.id,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            document: DocumentView::new(document, state.storage.as_ref()),
            documents,
        }),
    ))
}

/// DELETE /api/v1/documents/:id
///
/// Returns the remaining documents.
pub async fn handle_delete_document(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DocumentView>>, AppError> {
    service::delete_document(
        state.repos.documents.as_ref(),
        state.storage.as_ref(),
        session.user.id,
        id,
    )
    .await?;
    let documents = service::list_documents(
        state.repos.documents.as_ref(),
        state.storage.as_ref(),
        session.user.id,
    )
    .await?;
    Ok(Json(documents))
}

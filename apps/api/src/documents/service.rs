//! Document upload / delete against the object store plus metadata table.
//!
//! Upload writes the object first and the row second; a failed row insert
//! removes the orphaned object. Delete removes the row first, so a failed
//! metadata delete never leaves a row pointing at a missing object.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{Document, DocumentType, NewDocument};
use crate::repo::{ApplicationRepository, DocumentRepository};
use crate::storage::{document_urls, storage_path, DocumentUrls, ObjectStore};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Parsed multipart upload. Every field is optional here so validation can
/// name the one that is missing.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub doc_type: Option<DocumentType>,
    pub application_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub document: Document,
    #[serde(flatten)]
    pub urls: DocumentUrls,
}

impl DocumentView {
    pub fn new(document: Document, store: &dyn ObjectStore) -> Self {
        let urls = document_urls(store, &document.storage_path, &document.name);
        Self { document, urls }
    }
}

pub async fn list_documents(
    documents: &dyn DocumentRepository,
    store: &dyn ObjectStore,
    user_id: Uuid,
) -> Result<Vec<DocumentView>, AppError> {
    Ok(documents
        .list_documents(user_id)
        .await?
        .into_iter()
        .map(|doc| DocumentView::new(doc, store))
        .collect())
}

pub async fn upload_document(
    documents: &dyn DocumentRepository,
    applications: &dyn ApplicationRepository,
    store: &dyn ObjectStore,
    user_id: Uuid,
    upload: DocumentUpload,
    max_bytes: usize,
    now: DateTime<Utc>,
) -> Result<Document, AppError> {
    let doc_type = upload
        .doc_type
        .ok_or_else(|| AppError::invalid_field("documentType", "Select a document type"))?;
    let file_name = upload
        .file_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::invalid_field("file", "Choose a file to upload"))?;
    if upload.body.is_empty() {
        return Err(AppError::invalid_field("file", "The selected file is empty"));
    }
    if upload.body.len() > max_bytes {
        return Err(AppError::invalid_field(
            "file",
            format!("Files must be {} MiB or smaller", max_bytes / (1024 * 1024)),
        ));
    }

    if let Some(application_id) = upload.application_id {
        let owned = applications
            .get_application(application_id)
            .await?
            .is_some_and(|a| a.user_id == user_id);
        if !owned {
            return Err(AppError::NotFound(format!(
                "Application {application_id} not found"
            )));
        }
    }

    let path = storage_path(user_id, doc_type, now, &file_name);
    let size = upload.body.len() as i64;
    let content_type = upload
        .content_type
        .as_deref()
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    store
        .put_object(&path, upload.body, content_type)
        .await
        .map_err(|e| {
            error!("Upload of {path} failed: {e}");
            e
        })?;

    let inserted = documents
        .insert_document(NewDocument {
            user_id,
            name: file_name,
            doc_type,
            size,
            storage_path: path.clone(),
            application_id: upload.application_id,
        })
        .await;

    match inserted {
        Ok(document) => {
            info!("User {user_id} uploaded {} ({size} bytes)", document.storage_path);
            Ok(document)
        }
        Err(e) => {
            error!("Saving metadata for {path} failed: {e}");
            if let Err(cleanup) = store.delete_object(&path).await {
                warn!("Orphaned upload {path} could not be removed: {cleanup}");
            }
            Err(e)
        }
    }
}

pub async fn delete_document(
    documents: &dyn DocumentRepository,
    store: &dyn ObjectStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), AppError> {
    let document = documents
        .get_document(id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

    let deleted = documents.delete_document(id, user_id).await.map_err(|e| {
        error!("Deleting metadata for document {id} failed: {e}");
        e
    })?;
    if !deleted {
        return Err(AppError::NotFound(format!("Document {id} not found")));
    }

    store
        .delete_object(&document.storage_path)
        .await
        .map_err(|e| {
            error!(
                "Document {id} removed but object {} was not: {e}",
                document.storage_path
            );
            e
        })?;

    info!("User {user_id} deleted document {id}");
    Ok(())
}

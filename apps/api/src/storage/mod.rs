//! Object storage for uploaded documents. One bucket, addressed by
//! `{user_id}/{document_type}/{timestamp_ms}-{file_name}`.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::DocumentType;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, path: &str, body: Bytes, content_type: &str)
        -> Result<(), AppError>;

    async fn delete_object(&self, path: &str) -> Result<(), AppError>;

    /// Publicly readable URL of an object. No request is made.
    fn public_url(&self, path: &str) -> String;
}

pub fn storage_path(
    user_id: Uuid,
    doc_type: DocumentType,
    uploaded_at: DateTime<Utc>,
    file_name: &str,
) -> String {
    format!(
        "{user_id}/{doc_type}/{}-{}",
        uploaded_at.timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

/// Keeps the last path component and replaces anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUrls {
    pub view_url: String,
    /// Same object; the `download` query parameter asks the CDN for an attachment.
    pub download_url: String,
}

pub fn document_urls(store: &dyn ObjectStore, path: &str, file_name: &str) -> DocumentUrls {
    let view_url = store.public_url(path);
    let download_url = match reqwest::Url::parse(&view_url) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("download", file_name);
            url.to_string()
        }
        Err(_) => format!("{view_url}?download={}", sanitize_file_name(file_name)),
    };
    DocumentUrls {
        view_url,
        download_url,
    }
}

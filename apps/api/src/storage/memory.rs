use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::ObjectStore;
use crate::errors::AppError;

/// Process-local bucket used by `DATA_BACKEND=memory` and by tests.
#[derive(Clone)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
    base_url: String,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        path: &str,
        body: Bytes,
        _content_type: &str,
    ) -> Result<(), AppError> {
        self.objects.write().await.insert(path.to_string(), body);
        Ok(())
    }

    async fn delete_object(&self, path: &str) -> Result<(), AppError> {
        self.objects.write().await.remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

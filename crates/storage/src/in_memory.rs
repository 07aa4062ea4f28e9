//! In-memory store: useful for testing and offline sessions.

use agenrp_core::error::StorageError;
use agenrp_core::storage::{DocumentRecord, DocumentStore, NewDocumentRecord, StoredObject, UploadFile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

const URL_SCHEME: &str = "memory://";

/// A store that keeps objects in a map and metadata rows in a Vec.
pub struct InMemoryStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    records: Arc<RwLock<Vec<DocumentRecord>>>,
    next_id: AtomicU64,
    reject_metadata: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            records: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(1),
            reject_metadata: AtomicBool::new(false),
        }
    }

    /// Make every metadata insert fail, as a missing table would.
    pub fn reject_metadata(&self, reject: bool) {
        self.reject_metadata.store(reject, Ordering::SeqCst);
    }

    /// Add a metadata row pointing at an object that was never uploaded.
    pub async fn insert_dangling_record(&self, name: &str, mime_type: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.write().await.push(DocumentRecord {
            id: id.to_string(),
            name: name.into(),
            mime_type: mime_type.into(),
            public_url: format!("{URL_SCHEME}missing/{id}"),
        });
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn upload(&self, file: &UploadFile) -> Result<StoredObject, StorageError> {
        let seq = self.next_id.fetch_add(1, Ordering::SeqCst);
        let path = format!("rp_docs/{seq}_{}", file.name);
        self.objects
            .write()
            .await
            .insert(path.clone(), file.bytes.clone());
        Ok(StoredObject {
            public_url: format!("{URL_SCHEME}{path}"),
            path,
        })
    }

    async fn insert_metadata(&self, record: NewDocumentRecord) -> Result<(), StorageError> {
        if self.reject_metadata.load(Ordering::SeqCst) {
            return Err(StorageError::QueryFailed {
                status_code: 404,
                message: "relation \"rp_documents\" does not exist".into(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.write().await.push(DocumentRecord {
            id: id.to_string(),
            name: record.name,
            mime_type: record.mime_type,
            public_url: record.public_url,
        });
        Ok(())
    }

    async fn list_metadata(&self) -> Result<Vec<DocumentRecord>, StorageError> {
        Ok(self.records.read().await.clone())
    }

    async fn fetch(&self, public_url: &str) -> Result<Vec<u8>, StorageError> {
        let path = public_url.strip_prefix(URL_SCHEME).unwrap_or(public_url);
        self.objects
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::DownloadFailed {
                url: public_url.to_string(),
                message: "status 404".into(),
            })
    }
}

//! DocumentStore trait: cloud persistence for reference documents.
//!
//! A store holds the raw files in an object bucket and a metadata table
//! listing them. Implementations: Supabase (REST), in-memory (for testing).

use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// A file about to be uploaded.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Object path inside the bucket
    pub path: String,
    /// Publicly readable URL
    pub public_url: String,
}

/// A row to insert into the metadata table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocumentRecord {
    pub name: String,
    pub mime_type: String,
    pub storage_path: String,
    pub public_url: String,
}

/// A row read back from the metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Row id; numeric ids are normalized to strings
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub public_url: String,
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported document id: {other}"
        ))),
    }
}

/// The core DocumentStore trait.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The backend name (e.g., "supabase", "in_memory").
    fn name(&self) -> &str;

    /// Upload a file to the object bucket.
    async fn upload(&self, file: &UploadFile) -> Result<StoredObject, StorageError>;

    /// Record an uploaded file in the metadata table.
    async fn insert_metadata(&self, record: NewDocumentRecord) -> Result<(), StorageError>;

    /// List every recorded document.
    async fn list_metadata(&self) -> Result<Vec<DocumentRecord>, StorageError>;

    /// Download an object by its public URL.
    async fn fetch(&self, public_url: &str) -> Result<Vec<u8>, StorageError>;
}

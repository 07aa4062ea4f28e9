//! Uploading documents to a store and hydrating them back.

use agenrp_core::codec;
use agenrp_core::document::{APPLICATION_PDF, DocumentSource, ReferenceDocument};
use agenrp_core::error::{Result, StorageError};
use agenrp_core::storage::{DocumentStore, NewDocumentRecord, StoredObject, UploadFile};
use tracing::{debug, info, warn};

/// Upload a file and record it in the metadata table.
///
/// A metadata failure is logged and does not fail the upload: the object is
/// already in the bucket and reachable through its public URL.
pub async fn upload_document(store: &dyn DocumentStore, file: &UploadFile) -> Result<StoredObject> {
    let stored = store.upload(file).await?;
    info!(backend = store.name(), path = %stored.path, "Document uploaded");

    let record = NewDocumentRecord {
        name: file.name.clone(),
        mime_type: file.mime_type.clone(),
        storage_path: stored.path.clone(),
        public_url: stored.public_url.clone(),
    };
    if let Err(e) = store.insert_metadata(record).await {
        warn!(path = %stored.path, error = %e, "Metadata not saved, but file uploaded");
    }

    Ok(stored)
}

/// A stored document that could not be downloaded.
#[derive(Debug)]
pub struct FailedDownload {
    pub name: String,
    pub error: StorageError,
}

/// Documents retrieved from a store.
#[derive(Debug, Default)]
pub struct RemoteDocuments {
    pub documents: Vec<ReferenceDocument>,
    pub failed: Vec<FailedDownload>,
}

/// List the metadata table and download every listed object.
///
/// PDFs become data URIs; every other type is read as text under its
/// declared content type, so unsupported types surface later through
/// classification rather than disappearing here. A failed download is
/// reported in `failed` and does not stop the others.
pub async fn load_remote_documents(store: &dyn DocumentStore) -> Result<RemoteDocuments> {
    let records = store.list_metadata().await?;
    debug!(backend = store.name(), count = records.len(), "Listed stored documents");

    let mut loaded = RemoteDocuments::default();
    for record in records {
        let bytes = match store.fetch(&record.public_url).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(name = %record.name, error = %error, "Failed to download stored document");
                loaded.failed.push(FailedDownload {
                    name: record.name,
                    error,
                });
                continue;
            }
        };

        let content = if record.mime_type == APPLICATION_PDF {
            codec::encode(APPLICATION_PDF, &bytes)
        } else {
            String::from_utf8_lossy(&bytes).into_owned()
        };

        loaded.documents.push(ReferenceDocument {
            id: record.id,
            name: record.name,
            content,
            mime_type: record.mime_type,
            source: DocumentSource::Remote,
        });
    }

    info!(
        loaded = loaded.documents.len(),
        failed = loaded.failed.len(),
        "Remote documents hydrated"
    );
    Ok(loaded)
}

//! Supabase document store.
//!
//! Files go to a Storage bucket, metadata rows to a PostgREST table.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | upload | `POST {url}/storage/v1/object/{bucket}/{path}` |
//! | public URL | `{url}/storage/v1/object/public/{bucket}/{path}` |
//! | insert metadata | `POST {url}/rest/v1/{table}` |
//! | list metadata | `GET {url}/rest/v1/{table}?select=*` |

use agenrp_config::ResolvedBackend;
use agenrp_core::error::StorageError;
use agenrp_core::storage::{DocumentRecord, DocumentStore, NewDocumentRecord, StoredObject, UploadFile};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

/// Supabase REST client for the document bucket and metadata table.
pub struct SupabaseStore {
    backend: ResolvedBackend,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(backend: ResolvedBackend) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { backend, client }
    }

    /// Object path for a new upload: `{folder}/{unix_millis}_{name}`.
    fn object_path(&self, name: &str) -> String {
        format!(
            "{}/{}_{}",
            self.backend.folder,
            Utc::now().timestamp_millis(),
            name
        )
    }

    /// `{url}/storage/v1/object/{prefix..}/{bucket}/{path}`, with every
    /// segment percent-encoded. File names may contain `#`, `?` or spaces.
    fn storage_url(&self, prefix: &[&str], path: &str) -> Result<reqwest::Url, StorageError> {
        let mut url = reqwest::Url::parse(&self.backend.url).map_err(|e| {
            StorageError::NotConfigured(format!("invalid Supabase URL '{}': {e}", self.backend.url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                StorageError::NotConfigured(format!("Supabase URL '{}' has no path", self.backend.url))
            })?
            .pop_if_empty()
            .extend(["storage", "v1", "object"])
            .extend(prefix)
            .push(&self.backend.bucket)
            .extend(path.split('/'));
        Ok(url)
    }

    fn object_url(&self, path: &str) -> Result<reqwest::Url, StorageError> {
        self.storage_url(&[], path)
    }

    /// Publicly readable URL of an object.
    pub fn public_url(&self, path: &str) -> Result<String, StorageError> {
        self.storage_url(&["public"], path).map(String::from)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.backend.url, self.backend.table)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.backend.anon_key)
            .header("Authorization", format!("Bearer {}", self.backend.anon_key))
    }
}

#[async_trait]
impl DocumentStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn upload(&self, file: &UploadFile) -> Result<StoredObject, StorageError> {
        let path = self.object_path(&file.name);
        let url = self.object_url(&path)?;
        debug!(path = %path, bytes = file.bytes.len(), "Uploading document");

        let response = self
            .authorized(self.client.post(url))
            .header("Content-Type", &file.mime_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status, path = %path, "Storage upload rejected");
            return Err(StorageError::UploadFailed {
                path,
                status_code: status,
                message,
            });
        }

        Ok(StoredObject {
            public_url: self.public_url(&path)?,
            path,
        })
    }

    async fn insert_metadata(&self, record: NewDocumentRecord) -> Result<(), StorageError> {
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(StorageError::QueryFailed {
                status_code: status,
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn list_metadata(&self) -> Result<Vec<DocumentRecord>, StorageError> {
        let response = self
            .authorized(self.client.get(self.table_url()))
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(StorageError::QueryFailed {
                status_code: status,
                message: response.text().await.unwrap_or_default(),
            });
        }

        response.json().await.map_err(|e| StorageError::QueryFailed {
            status_code: status,
            message: format!("Failed to parse metadata rows: {e}"),
        })
    }

    async fn fetch(&self, public_url: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get(public_url)
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::DownloadFailed {
                url: public_url.to_string(),
                message: format!("status {}", response.status().as_u16()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed {
                url: public_url.to_string(),
                message: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseStore {
        SupabaseStore::new(ResolvedBackend {
            url: "https://abc.supabase.co".into(),
            anon_key: "anon".into(),
            bucket: "rp_files".into(),
            table: "rp_documents".into(),
            folder: "rp_docs".into(),
        })
    }

    #[test]
    fn object_path_is_prefixed_and_timestamped() {
        let path = store().object_path("Jilid1.pdf");
        let rest = path.strip_prefix("rp_docs/").unwrap();
        let (millis, name) = rest.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(name, "Jilid1.pdf");
    }

    #[test]
    fn urls_follow_supabase_layout() {
        let store = store();
        assert_eq!(
            store.object_url("rp_docs/1_a.pdf").unwrap().as_str(),
            "https://abc.supabase.co/storage/v1/object/rp_files/rp_docs/1_a.pdf"
        );
        assert_eq!(
            store.public_url("rp_docs/1_a.pdf").unwrap(),
            "https://abc.supabase.co/storage/v1/object/public/rp_files/rp_docs/1_a.pdf"
        );
        assert_eq!(store.table_url(), "https://abc.supabase.co/rest/v1/rp_documents");
        assert_eq!(store.name(), "supabase");
    }

    #[test]
    fn file_names_are_percent_encoded() {
        let store = store();
        let url = store.object_url("rp_docs/1_Jilid #1?v2.pdf").unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/storage/v1/object/rp_files/rp_docs/1_Jilid%20%231%3Fv2.pdf"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let public = store.public_url("rp_docs/1_Jilid #1?v2.pdf").unwrap();
        assert!(public.ends_with("/public/rp_files/rp_docs/1_Jilid%20%231%3Fv2.pdf"));
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let store = SupabaseStore::new(ResolvedBackend {
            url: "https://abc.supabase.co/".into(),
            anon_key: "anon".into(),
            bucket: "rp_files".into(),
            table: "rp_documents".into(),
            folder: "rp_docs".into(),
        });
        assert_eq!(
            store.public_url("rp_docs/1_a.pdf").unwrap(),
            "https://abc.supabase.co/storage/v1/object/public/rp_files/rp_docs/1_a.pdf"
        );
    }

    #[test]
    fn invalid_base_url_is_not_configured() {
        let store = SupabaseStore::new(ResolvedBackend {
            url: "not a url".into(),
            anon_key: "anon".into(),
            bucket: "rp_files".into(),
            table: "rp_documents".into(),
            folder: "rp_docs".into(),
        });
        assert!(matches!(
            store.public_url("rp_docs/1_a.pdf"),
            Err(StorageError::NotConfigured(_))
        ));
    }
}

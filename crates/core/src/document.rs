//! Reference documents: the only source the model may answer from.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content type of inline text documents.
pub const TEXT_PLAIN: &str = "text/plain";

/// Content type of binary PDF documents.
pub const APPLICATION_PDF: &str = "application/pdf";

/// Where a document came from. Provenance only; grounding ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSource {
    Local,
    Remote,
}

/// How a document's content is carried to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Raw text, inlined into the system instruction
    Text,
    /// Data-URI encoded PDF, sent as a binary block
    Pdf,
}

/// An uploaded or retrieved document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub id: String,

    /// Display name; not required to be unique
    pub name: String,

    /// Raw text for `text/plain`, a `data:application/pdf;base64,` URI for PDFs
    pub content: String,

    /// Declared content type
    pub mime_type: String,

    pub source: DocumentSource,
}

impl ReferenceDocument {
    /// A plain-text document.
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            content: content.into(),
            mime_type: TEXT_PLAIN.into(),
            source: DocumentSource::Local,
        }
    }

    /// A PDF document whose content is already a data URI.
    pub fn pdf(name: impl Into<String>, data_uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            content: data_uri.into(),
            mime_type: APPLICATION_PDF.into(),
            source: DocumentSource::Local,
        }
    }

    /// Override the provenance tag.
    pub fn with_source(mut self, source: DocumentSource) -> Self {
        self.source = source;
        self
    }

    /// Override the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Resolve the declared content type.
    pub fn kind(&self) -> Result<DocumentKind> {
        match self.mime_type.as_str() {
            TEXT_PLAIN => Ok(DocumentKind::Text),
            APPLICATION_PDF => Ok(DocumentKind::Pdf),
            other => Err(Error::UnsupportedDocumentType {
                name: self.name.clone(),
                mime_type: other.to_string(),
            }),
        }
    }
}

/// The active document set. Ordered, with identifiers unique within the set.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<ReferenceDocument>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any existing one with the same id.
    pub fn insert(&mut self, document: ReferenceDocument) {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    /// Remove a document by id. Returns the removed document, if any.
    pub fn remove(&mut self, id: &str) -> Option<ReferenceDocument> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(index))
    }

    pub fn as_slice(&self) -> &[ReferenceDocument] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<ReferenceDocument> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = ReferenceDocument>>(iter: I) -> Self {
        let mut set = Self::new();
        for document in iter {
            set.insert(document);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_mime_type() {
        let text = ReferenceDocument::text("Jilid1.txt", "Zon: Perumahan");
        let pdf = ReferenceDocument::pdf("Jilid2.pdf", "data:application/pdf;base64,JVBERi0=");
        assert_eq!(text.kind().unwrap(), DocumentKind::Text);
        assert_eq!(pdf.kind().unwrap(), DocumentKind::Pdf);
    }

    #[test]
    fn unknown_mime_type_is_rejected() {
        let mut doc = ReferenceDocument::text("peta.png", "");
        doc.mime_type = "image/png".into();
        match doc.kind() {
            Err(Error::UnsupportedDocumentType { name, mime_type }) => {
                assert_eq!(name, "peta.png");
                assert_eq!(mime_type, "image/png");
            }
            other => panic!("expected UnsupportedDocumentType, got {other:?}"),
        }
    }

    #[test]
    fn set_insert_and_remove() {
        let mut set = DocumentSet::new();
        set.insert(ReferenceDocument::text("a.txt", "A").with_id("1"));
        set.insert(ReferenceDocument::text("b.txt", "B").with_id("2"));
        assert_eq!(set.len(), 2);

        let removed = set.remove("1").unwrap();
        assert_eq!(removed.name, "a.txt");
        assert!(set.iter().all(|d| d.id != "1"));
        assert!(set.remove("missing").is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_ids_stay_unique() {
        let set: DocumentSet = vec![
            ReferenceDocument::text("a.txt", "old").with_id("same"),
            ReferenceDocument::text("a.txt", "new").with_id("same"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].content, "new");
    }

    #[test]
    fn source_serializes_lowercase() {
        let doc = ReferenceDocument::text("a.txt", "A").with_source(DocumentSource::Remote);
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"source\":\"remote\""));
    }
}

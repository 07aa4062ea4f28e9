//! Document classification.
//!
//! Splits the active document set into documents inlined as text and
//! documents carried as binary PDF blocks. Pure; never logs.

use agenrp_core::document::{DocumentKind, ReferenceDocument};
use agenrp_core::error::Error;

/// A document dropped from both partitions.
#[derive(Debug)]
pub struct Rejected<'a> {
    pub document: &'a ReferenceDocument,
    /// Always [`Error::UnsupportedDocumentType`].
    pub error: Error,
}

/// Result of [`classify`]. Each partition keeps input order.
#[derive(Debug, Default)]
pub struct Classified<'a> {
    pub text: Vec<&'a ReferenceDocument>,
    pub pdf: Vec<&'a ReferenceDocument>,
    pub rejected: Vec<Rejected<'a>>,
}

impl Classified<'_> {
    /// Number of documents that made it into a partition.
    pub fn accepted(&self) -> usize {
        self.text.len() + self.pdf.len()
    }
}

/// Partition documents by declared content type.
///
/// Unsupported types are reported in `rejected` and left out of both
/// partitions; classification itself never fails.
pub fn classify(documents: &[ReferenceDocument]) -> Classified<'_> {
    let mut classified = Classified::default();
    for document in documents {
        match document.kind() {
            Ok(DocumentKind::Text) => classified.text.push(document),
            Ok(DocumentKind::Pdf) => classified.pdf.push(document),
            Err(error) => classified.rejected.push(Rejected { document, error }),
        }
    }
    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_mime(name: &str, mime: &str) -> ReferenceDocument {
        let mut doc = ReferenceDocument::text(name, "x").with_id(name);
        doc.mime_type = mime.into();
        doc
    }

    #[test]
    fn empty_input_gives_empty_partitions() {
        let classified = classify(&[]);
        assert!(classified.text.is_empty());
        assert!(classified.pdf.is_empty());
        assert!(classified.rejected.is_empty());
    }

    #[test]
    fn partitions_preserve_relative_order() {
        let docs = vec![
            with_mime("t1", "text/plain"),
            with_mime("p1", "application/pdf"),
            with_mime("t2", "text/plain"),
            with_mime("p2", "application/pdf"),
            with_mime("t3", "text/plain"),
        ];
        let classified = classify(&docs);
        let text: Vec<_> = classified.text.iter().map(|d| d.id.as_str()).collect();
        let pdf: Vec<_> = classified.pdf.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(text, ["t1", "t2", "t3"]);
        assert_eq!(pdf, ["p1", "p2"]);
        assert_eq!(classified.accepted(), docs.len());
    }

    #[test]
    fn unsupported_type_is_dropped_and_reported() {
        let docs = vec![
            with_mime("a", "text/plain"),
            with_mime("peta", "image/png"),
            with_mime("b", "application/pdf"),
        ];
        let classified = classify(&docs);
        assert_eq!(classified.accepted(), 2);
        assert_eq!(classified.rejected.len(), 1);
        let rejected = &classified.rejected[0];
        assert_eq!(rejected.document.id, "peta");
        assert!(matches!(
            rejected.error,
            Error::UnsupportedDocumentType { ref mime_type, .. } if mime_type == "image/png"
        ));
    }

    #[test]
    fn no_document_lands_in_both_partitions() {
        let docs = vec![
            with_mime("a", "text/plain"),
            with_mime("b", "application/pdf"),
            with_mime("c", "text/markdown"),
        ];
        let classified = classify(&docs);
        for text in &classified.text {
            assert!(!classified.pdf.iter().any(|p| p.id == text.id));
        }
        assert_eq!(
            classified.accepted() + classified.rejected.len(),
            docs.len()
        );
    }
}

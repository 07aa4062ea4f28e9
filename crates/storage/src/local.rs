//! Local file loaders.
//!
//! Accepted documents: `.txt` and `.md` (as `text/plain`), `.pdf` (as a
//! data URI). Anything else fails with `UnsupportedDocumentType` instead of
//! being skipped.

use agenrp_core::codec;
use agenrp_core::document::{APPLICATION_PDF, TEXT_PLAIN, ReferenceDocument};
use agenrp_core::error::{Error, Result};
use agenrp_core::storage::UploadFile;
use std::path::Path;
use tracing::debug;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Content type of a document file, judged by extension.
pub fn document_mime_type(path: &Path) -> Result<&'static str> {
    match extension(path).as_str() {
        "txt" | "md" => Ok(TEXT_PLAIN),
        "pdf" => Ok(APPLICATION_PDF),
        other => Err(Error::UnsupportedDocumentType {
            name: file_name(path),
            mime_type: if other.is_empty() {
                "application/octet-stream".into()
            } else {
                format!("application/x-{other}")
            },
        }),
    }
}

/// Content type of an image attachment, judged by extension.
pub fn image_mime_type(path: &Path) -> Result<&'static str> {
    match extension(path).as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        "heic" => Ok("image/heic"),
        "heif" => Ok("image/heif"),
        other => Err(Error::UnsupportedDocumentType {
            name: file_name(path),
            mime_type: format!("image/{other}"),
        }),
    }
}

/// Read a local file into a reference document.
pub async fn load_local_document(path: &Path) -> Result<ReferenceDocument> {
    let mime_type = document_mime_type(path)?;
    let bytes = tokio::fs::read(path).await?;
    let name = file_name(path);
    debug!(name = %name, bytes = bytes.len(), mime_type, "Loaded local document");

    Ok(if mime_type == APPLICATION_PDF {
        ReferenceDocument::pdf(name, codec::encode(APPLICATION_PDF, &bytes))
    } else {
        ReferenceDocument::text(name, String::from_utf8_lossy(&bytes).into_owned())
    })
}

/// Read an image file into a data URI.
pub async fn load_image_attachment(path: &Path) -> Result<String> {
    let mime_type = image_mime_type(path)?;
    let bytes = tokio::fs::read(path).await?;
    Ok(codec::encode(mime_type, &bytes))
}

/// Read a document file for upload to a store.
pub async fn upload_file_from_path(path: &Path) -> Result<UploadFile> {
    let mime_type = document_mime_type(path)?;
    let bytes = tokio::fs::read(path).await?;
    Ok(UploadFile {
        name: file_name(path),
        mime_type: mime_type.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenrp_core::document::{DocumentKind, DocumentSource};

    #[tokio::test]
    async fn text_and_markdown_load_as_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("Jilid1.txt");
        let md = dir.path().join("Nota.MD");
        std::fs::write(&txt, "Zon: Perumahan").unwrap();
        std::fs::write(&md, "# Dasar").unwrap();

        let doc = load_local_document(&txt).await.unwrap();
        assert_eq!(doc.name, "Jilid1.txt");
        assert_eq!(doc.content, "Zon: Perumahan");
        assert_eq!(doc.kind().unwrap(), DocumentKind::Text);
        assert_eq!(doc.source, DocumentSource::Local);

        let doc = load_local_document(&md).await.unwrap();
        assert_eq!(doc.mime_type, TEXT_PLAIN);
    }

    #[tokio::test]
    async fn pdf_loads_as_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("Jilid2.pdf");
        std::fs::write(&pdf, b"ABC").unwrap();

        let doc = load_local_document(&pdf).await.unwrap();
        assert_eq!(doc.kind().unwrap(), DocumentKind::Pdf);
        assert_eq!(doc.content, "data:application/pdf;base64,QUJD");
    }

    #[tokio::test]
    async fn other_extensions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let docx = dir.path().join("surat.docx");
        std::fs::write(&docx, b"x").unwrap();

        let err = load_local_document(&docx).await.unwrap_err();
        match err {
            Error::UnsupportedDocumentType { name, .. } => assert_eq!(name, "surat.docx"),
            other => panic!("expected UnsupportedDocumentType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_local_document(&dir.path().join("tiada.txt")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn image_becomes_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("lot.png");
        std::fs::write(&png, b"ABC").unwrap();

        let uri = load_image_attachment(&png).await.unwrap();
        assert_eq!(uri, "data:image/png;base64,QUJD");
        let block = codec::decode(&uri).unwrap();
        assert_eq!(block.mime_type, "image/png");

        let bmp = dir.path().join("lot.bmp");
        std::fs::write(&bmp, b"x").unwrap();
        assert!(load_image_attachment(&bmp).await.is_err());
    }

    #[tokio::test]
    async fn upload_file_carries_type_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("Jilid3.pdf");
        std::fs::write(&pdf, b"%PDF").unwrap();

        let file = upload_file_from_path(&pdf).await.unwrap();
        assert_eq!(file.name, "Jilid3.pdf");
        assert_eq!(file.mime_type, APPLICATION_PDF);
        assert_eq!(file.bytes, b"%PDF");
    }
}

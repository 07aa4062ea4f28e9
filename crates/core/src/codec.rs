//! Attachment codec: data URIs in, raw bytes plus content type out.
//!
//! Images and PDFs travel through the transcript and the document set as
//! `data:<mime>;base64,<payload>` strings. The model API wants the decoded
//! payload and its content type as separate fields.

use crate::document::APPLICATION_PDF;
use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

const PDF_PREFIX: &str = "data:application/pdf;base64,";

/// A decoded binary payload tagged with its content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryBlock {
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl BinaryBlock {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Split a data URI into its content type and decoded payload.
///
/// The header is everything before the first `,`; the content type sits
/// between the `:` and the first `;` of that header.
pub fn decode(data_uri: &str) -> Result<BinaryBlock> {
    let (header, payload) = data_uri
        .split_once(',')
        .ok_or_else(|| malformed("missing ',' before payload"))?;
    let (_, type_and_params) = header
        .split_once(':')
        .ok_or_else(|| malformed("missing ':' after scheme"))?;
    let (mime_type, _) = type_and_params
        .split_once(';')
        .ok_or_else(|| malformed("missing ';' after content type"))?;

    if mime_type.trim().is_empty() {
        return Err(malformed("empty content type"));
    }

    Ok(BinaryBlock {
        mime_type: mime_type.to_string(),
        data: decode_base64(payload)?,
    })
}

/// Decode a PDF document's content.
///
/// Upstream producers do not always include the `data:application/pdf;base64,`
/// prefix; without it the whole string is taken as the payload.
pub fn decode_pdf(content: &str) -> Result<BinaryBlock> {
    let payload = content.strip_prefix(PDF_PREFIX).unwrap_or(content);
    Ok(BinaryBlock {
        mime_type: APPLICATION_PDF.to_string(),
        data: decode_base64(payload)?,
    })
}

/// Build a `data:<mime>;base64,<payload>` URI.
pub fn encode(mime_type: &str, data: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64_STANDARD.encode(data))
}

fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| malformed(&format!("invalid base64 payload: {e}")))
}

fn malformed(reason: &str) -> Error {
    Error::MalformedAttachment(reason.to_string())
}

mod base64_bytes {
    use super::BASE64_STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

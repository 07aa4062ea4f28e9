//! User-facing fixed messages.
//!
//! Every failed call ends up in the transcript as exactly one of these
//! strings (see [`describe_failure`]).

use agenrp_core::error::{Error, FailureKind};

pub const APP_NAME: &str = "Agen RP Maya";

pub const APP_SUBTITLE: &str = "Semakan Rancangan Pemajuan Pintar";

/// Opening `model` entry of a new session.
pub const WELCOME_MESSAGE: &str = "Selamat datang ke **Agen RP Maya**.\n\n\
Saya sedia membantu anda menyemak zon guna tanah, dasar pembangunan, atau perkara lain \
berdasarkan dokumen Rancangan Pemajuan.\n\n\
Sila muat naik dokumen RP (Cth: Jilid 1, Jilid 2, Jilid 3) untuk bermula.";

/// Stored when the model returns no text.
pub const EMPTY_REPLY: &str = "Maaf, saya tidak dapat menjana jawapan pada masa ini.";

/// Generic connection failure.
pub const CONNECTION_ERROR: &str =
    "Maaf, berlaku ralat sambungan atau masalah teknikal. Sila cuba lagi sebentar lagi.";

/// Shown when no API key resolved.
pub const MISSING_KEY: &str = "⚠️ **API Key Diperlukan**\n\n\
Sila tetapkan API Key anda dengan `agenrp config set-key <KEY>`, pembolehubah \
persekitaran `GEMINI_API_KEY`, atau pilihan `--api-key`.\n\n\
(Atas sebab keselamatan, API Key tidak disimpan dalam kod sistem.)";

pub const TECHNICAL_ERROR_PREFIX: &str = "⚠️ RALAT TEKNIKAL: ";

pub const AUTH_REJECTED: &str = "API Key ditolak. Kunci mungkin telah tamat tempoh, salah, atau disekat (Leaked). Sila jana kunci baru.";

pub const QUOTA_EXCEEDED: &str =
    "Kuota penggunaan API telah habis (Quota Exceeded). Sila cuba sebentar lagi.";

pub const BAD_REQUEST: &str =
    "Permintaan tidak sah (Bad Request). Sila semak fail atau input anda.";

pub const MALFORMED_ATTACHMENT: &str =
    "Lampiran tidak dapat dibaca. Sila pastikan fail imej atau PDF adalah sah dan cuba lagi.";

pub const DISCLAIMER: &str = "Agen RP Maya ini adalah simulasi AI. Jawapan yang diberikan \
bergantung sepenuhnya kepada dokumen yang dimuat naik. Keputusan muktamad adalah tertakluk \
kepada kelulusan Jawatankuasa Pusat Setempat (OSC) Pihak Berkuasa Tempatan.";

pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "Sediakan ringkasan RP ini",
    "Buat ringkasan jumlah inisiatif",
    "Berapakah nisbah plot maksimum kawasan ini?",
    "Apakah syarat bagi pembangunan stesen minyak?",
    "Buat ringkasan dasar alam sekitar",
];

/// Map a failed call to the notice appended to the transcript.
pub fn describe_failure(error: &Error) -> String {
    match error {
        Error::MissingCredential => MISSING_KEY.to_string(),
        Error::MalformedAttachment(_) => format!("{TECHNICAL_ERROR_PREFIX}{MALFORMED_ATTACHMENT}"),
        Error::Provider(_) | Error::Storage(_) => {
            let detail = match error.failure_kind() {
                Some(FailureKind::AuthRejected) => AUTH_REJECTED.to_string(),
                Some(FailureKind::QuotaExceeded) => QUOTA_EXCEEDED.to_string(),
                Some(FailureKind::BadRequest) => BAD_REQUEST.to_string(),
                _ => raw_message(error),
            };
            format!("{TECHNICAL_ERROR_PREFIX}{detail}")
        }
        Error::Io(_) => CONNECTION_ERROR.to_string(),
        other => format!("{TECHNICAL_ERROR_PREFIX}{other}"),
    }
}

fn raw_message(error: &Error) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        CONNECTION_ERROR.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenrp_core::error::{ProviderError, StorageError};

    #[test]
    fn missing_key_has_no_technical_prefix() {
        let notice = describe_failure(&Error::MissingCredential);
        assert_eq!(notice, MISSING_KEY);
    }

    #[test]
    fn status_failures_map_to_fixed_explanations() {
        let auth = Error::Provider(ProviderError::AuthenticationFailed("bad key".into()));
        assert_eq!(describe_failure(&auth), format!("{TECHNICAL_ERROR_PREFIX}{AUTH_REJECTED}"));

        let quota = Error::Provider(ProviderError::RateLimited("slow down".into()));
        assert!(describe_failure(&quota).ends_with(QUOTA_EXCEEDED));

        let bad = Error::Provider(ProviderError::ApiError {
            status_code: 400,
            message: "Invalid inline data".into(),
        });
        assert!(describe_failure(&bad).ends_with(BAD_REQUEST));
    }

    #[test]
    fn message_heuristic_applies_without_status() {
        let err = Error::Provider(ProviderError::Network("upstream said 429".into()));
        assert!(describe_failure(&err).ends_with(QUOTA_EXCEEDED));
    }

    #[test]
    fn unknown_failure_carries_raw_message() {
        let err = Error::Storage(StorageError::Network("dns lookup failed".into()));
        let notice = describe_failure(&err);
        assert!(notice.starts_with(TECHNICAL_ERROR_PREFIX));
        assert!(notice.contains("dns lookup failed"));
    }

    #[test]
    fn malformed_attachment_is_explained() {
        let err = Error::MalformedAttachment("missing ','".into());
        assert!(describe_failure(&err).ends_with(MALFORMED_ATTACHMENT));
    }
}

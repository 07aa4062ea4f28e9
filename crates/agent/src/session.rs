//! The chat session: transcript, active documents, and one model call at a time.

use crate::context::{ComposeInput, ContextComposer};
use crate::notices;
use agenrp_core::codec;
use agenrp_core::document::{DocumentSet, ReferenceDocument};
use agenrp_core::error::{Error, Result};
use agenrp_core::message::ConversationMessage;
use agenrp_core::provider::{Provider, ProviderRequest, default_temperature};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single conversation with the document-grounded assistant.
///
/// `send` takes `&mut self`, so a session never has more than one model call
/// in flight.
pub struct ChatSession {
    /// Model client; `None` when no API key resolved
    provider: Option<Arc<dyn Provider>>,

    composer: ContextComposer,

    /// Model identifier passed on every call
    model: String,

    temperature: f32,

    /// Append-only transcript, including local `system` notices
    transcript: Vec<ConversationMessage>,

    /// Active reference documents
    documents: DocumentSet,
}

impl ChatSession {
    /// Create a session that opens with the welcome message.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            provider: None,
            composer: ContextComposer::with_default_policy(),
            model: model.into(),
            temperature: default_temperature(),
            transcript: vec![ConversationMessage::model(notices::WELCOME_MESSAGE)],
            documents: DocumentSet::new(),
        }
    }

    /// Attach the model client.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the grounding composer (e.g. a custom policy).
    pub fn with_composer(mut self, composer: ContextComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Toggle the opening welcome message. Only meaningful before the first send.
    pub fn with_welcome(mut self, enabled: bool) -> Self {
        self.transcript.clear();
        if enabled {
            self.transcript
                .push(ConversationMessage::model(notices::WELCOME_MESSAGE));
        }
        self
    }

    /// Set or clear the model client, e.g. after the user supplies a key.
    pub fn set_provider(&mut self, provider: Option<Arc<dyn Provider>>) {
        self.provider = provider;
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // ── Documents ─────────────────────────────────────────────────────────

    /// Add a document to the active set.
    ///
    /// Documents of an unsupported type are rejected here rather than
    /// silently dropped at send time.
    pub fn add_document(&mut self, document: ReferenceDocument) -> Result<()> {
        document.kind()?;
        info!(
            id = %document.id,
            name = %document.name,
            mime_type = %document.mime_type,
            "Document added"
        );
        self.documents.insert(document);
        Ok(())
    }

    /// Remove a document by id.
    pub fn remove_document(&mut self, id: &str) -> Option<ReferenceDocument> {
        let removed = self.documents.remove(id);
        if let Some(document) = &removed {
            info!(id = %document.id, name = %document.name, "Document removed");
        }
        removed
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    // ── Transcript ────────────────────────────────────────────────────────

    /// Full transcript, including local notices.
    pub fn transcript(&self) -> &[ConversationMessage] {
        &self.transcript
    }

    /// Transcript entries meant for display as chat bubbles.
    pub fn visible_messages(&self) -> Vec<&ConversationMessage> {
        self.transcript
            .iter()
            .filter(|m| m.is_model_visible())
            .collect()
    }

    /// Send a message and append exactly one response entry.
    ///
    /// Returns the appended entry: the model reply, or a `system` notice when
    /// the call failed. An empty message (no text, no image) and an image that
    /// is not a well-formed data URI are errors and leave the transcript
    /// untouched; call failures are recorded in the transcript and never
    /// retried.
    pub async fn send(
        &mut self,
        text: &str,
        image: Option<String>,
    ) -> Result<&ConversationMessage> {
        if text.trim().is_empty() && image.is_none() {
            return Err(Error::EmptyMessage);
        }
        // A stored attachment is decoded again on every later call.
        if let Some(uri) = image.as_deref() {
            codec::decode(uri)?;
        }

        let history_len = self.transcript.len();
        let mut message = ConversationMessage::user(text);
        if let Some(uri) = image {
            message = message.with_attachment(uri);
        }
        self.transcript.push(message);

        let image = self.transcript[history_len].attachment.as_deref();
        let entry = match self.exchange(history_len, text, image).await {
            Ok(reply) => ConversationMessage::model(reply),
            Err(e) => {
                warn!(error = %e, "Model call failed");
                ConversationMessage::system(notices::describe_failure(&e))
            }
        };

        self.transcript.push(entry);
        Ok(&self.transcript[self.transcript.len() - 1])
    }

    async fn exchange(&self, history_len: usize, text: &str, image: Option<&str>) -> Result<String> {
        let provider = self.provider.as_ref().ok_or(Error::MissingCredential)?;

        let outbound = self.composer.compose(&ComposeInput {
            history: &self.transcript[..history_len],
            message: text,
            documents: self.documents.as_slice(),
            image,
        })?;

        for skipped in &outbound.metadata.skipped_documents {
            warn!(id = %skipped.id, name = %skipped.name, "Skipping document: {}", skipped.reason);
        }
        debug!(
            provider = provider.name(),
            text_documents = outbound.metadata.text_documents,
            pdf_documents = outbound.metadata.pdf_documents,
            history_turns = outbound.metadata.history_turns,
            estimated_tokens = outbound.metadata.estimated_tokens,
            "Request composed"
        );

        let request = ProviderRequest::from_outbound(self.model.as_str(), self.temperature, outbound);
        let response = provider.send(request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Model replied"
            );
        }

        Ok(response
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| notices::EMPTY_REPLY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenrp_core::error::ProviderError;
    use agenrp_core::message::Role;
    use agenrp_core::provider::ProviderResponse;
    use agenrp_core::request::TurnRole;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns scripted results in order and records every request.
    struct ScriptedProvider {
        results: Mutex<VecDeque<std::result::Result<ProviderResponse, ProviderError>>>,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(results: Vec<std::result::Result<ProviderResponse, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn reply(text: &str) -> std::result::Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                text: Some(text.into()),
                model: "test-model".into(),
                usage: None,
            })
        }

        fn requests(&self) -> Vec<ProviderRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            self.requests.lock().unwrap().push(request);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted result left")
        }
    }

    fn session(provider: &Arc<ScriptedProvider>) -> ChatSession {
        ChatSession::new("test-model").with_provider(provider.clone())
    }

    #[test]
    fn new_session_opens_with_welcome() {
        let session = ChatSession::new("m");
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, Role::Model);
        assert_eq!(session.transcript()[0].content, notices::WELCOME_MESSAGE);
        assert!(ChatSession::new("m").with_welcome(false).transcript().is_empty());
    }

    #[tokio::test]
    async fn reply_is_appended_after_user_message() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply("Zon Perumahan.")]);
        let mut session = session(&provider).with_welcome(false);

        let reply = session.send("Apakah zon?", None).await.unwrap();
        assert_eq!(reply.role, Role::Model);
        assert_eq!(reply.content, "Zon Perumahan.");

        let roles: Vec<_> = session.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::User, Role::Model]);
    }

    #[tokio::test]
    async fn history_excludes_the_new_message() {
        let provider = ScriptedProvider::new(vec![
            ScriptedProvider::reply("satu"),
            ScriptedProvider::reply("dua"),
        ]);
        let mut session = session(&provider);
        session.send("pertama", None).await.unwrap();
        session.send("kedua", None).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests[0].history.len(), 1);
        assert_eq!(requests[0].history[0].role, TurnRole::Model);
        assert_eq!(requests[0].message.text(), "pertama");

        let texts: Vec<_> = requests[1].history.iter().map(|t| t.text()).collect();
        assert_eq!(texts, [notices::WELCOME_MESSAGE, "pertama", "satu"]);
        assert_eq!(requests[1].message.text(), "kedua");
        assert_eq!(requests[1].model, "test-model");
    }

    #[tokio::test]
    async fn failure_becomes_one_system_notice() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::AuthenticationFailed("403 PERMISSION_DENIED".into())),
            ScriptedProvider::reply("ok"),
        ]);
        let mut session = session(&provider).with_welcome(false);

        let notice = session.send("soalan", None).await.unwrap();
        assert_eq!(notice.role, Role::System);
        assert!(notice.content.contains(notices::AUTH_REJECTED));
        assert_eq!(session.transcript().len(), 2);

        // The session stays usable and the notice never reaches the model.
        session.send("lagi", None).await.unwrap();
        let second = &provider.requests()[1];
        assert!(second.history.iter().all(|t| !t.text().contains("ditolak")));
        assert_eq!(second.history.len(), 1);
    }

    #[tokio::test]
    async fn missing_provider_yields_key_prompt() {
        let mut session = ChatSession::new("m");
        let notice = session.send("hai", None).await.unwrap();
        assert_eq!(notice.role, Role::System);
        assert_eq!(notice.content, notices::MISSING_KEY);
    }

    #[tokio::test]
    async fn empty_reply_uses_fallback() {
        let provider = ScriptedProvider::new(vec![Ok(ProviderResponse {
            text: None,
            model: "m".into(),
            usage: None,
        })]);
        let mut session = session(&provider);
        let reply = session.send("hai", None).await.unwrap();
        assert_eq!(reply.content, notices::EMPTY_REPLY);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let provider = ScriptedProvider::new(vec![]);
        let mut session = session(&provider);
        let err = session.send("   ", None).await.unwrap_err();
        assert!(matches!(err, Error::EmptyMessage));
        assert_eq!(session.transcript().len(), 1);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn image_only_message_is_allowed() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply("Lot zon industri.")]);
        let mut session = session(&provider);
        session
            .send("", Some("data:image/png;base64,QUJD".into()))
            .await
            .unwrap();
        let request = &provider.requests()[0];
        assert_eq!(request.message.binary().unwrap().data, b"ABC");
    }

    #[tokio::test]
    async fn malformed_image_is_rejected_and_session_recovers() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply("Zon Perumahan.")]);
        let mut session = session(&provider);

        let err = session
            .send("Lot ini?", Some("data:image/png;base64QUJD".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedAttachment(_)));
        assert_eq!(session.transcript().len(), 1);
        assert!(provider.requests().is_empty());

        let reply = session.send("Soalan lain", None).await.unwrap();
        assert_eq!(reply.role, Role::Model);
        assert_eq!(reply.content, "Zon Perumahan.");
        let request = &provider.requests()[0];
        assert!(request.history.iter().all(|t| t.binary_count() == 0));
    }

    #[tokio::test]
    async fn documents_flow_into_request() {
        let provider = ScriptedProvider::new(vec![ScriptedProvider::reply("ok")]);
        let mut session = session(&provider);
        session
            .add_document(ReferenceDocument::text("Jilid1.txt", "Zon: Perumahan"))
            .unwrap();
        session
            .add_document(ReferenceDocument::pdf("Jilid2.pdf", "data:application/pdf;base64,QUJD"))
            .unwrap();
        session.send("Zon?", None).await.unwrap();

        let request = &provider.requests()[0];
        assert!(request.system_instruction.contains("Zon: Perumahan"));
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[0].binary_count(), 1);
    }

    #[test]
    fn unsupported_document_is_rejected_on_add() {
        let mut session = ChatSession::new("m");
        let mut doc = ReferenceDocument::text("peta.png", "");
        doc.mime_type = "image/png".into();
        let err = session.add_document(doc).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDocumentType { .. }));
        assert!(session.documents().is_empty());
    }

    #[test]
    fn remove_document_by_id() {
        let mut session = ChatSession::new("m");
        session
            .add_document(ReferenceDocument::text("a.txt", "A").with_id("a"))
            .unwrap();
        assert_eq!(session.remove_document("a").unwrap().name, "a.txt");
        assert!(session.remove_document("a").is_none());
    }

    #[tokio::test]
    async fn visible_messages_hide_notices() {
        let mut session = ChatSession::new("m");
        session.send("hai", None).await.unwrap();
        assert_eq!(session.transcript().len(), 3);
        let visible = session.visible_messages();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|m| m.role != Role::System));
    }
}

//! Context composition: the request sent to the model for one call.
//!
//! Combines three layers:
//!
//! 1. **System instruction**: grounding policy, document status block, and
//!    the full text of every text document
//! 2. **Leading context**: one synthetic `user` turn carrying every PDF as a
//!    binary block, placed before all history
//! 3. **History + new turn**: the transcript minus local `system` entries,
//!    followed by the current message and optional image
//!
//! # Determinism
//!
//! Composition is pure: identical inputs produce identical requests. It never
//! logs or retries; skipped documents and counters are reported through
//! [`CompositionMetadata`].

use crate::context::classifier::{self, Classified};
use crate::context::policy;
use crate::context::token;
use agenrp_core::codec;
use agenrp_core::document::ReferenceDocument;
use agenrp_core::error::Result;
use agenrp_core::message::{ConversationMessage, Role};
use agenrp_core::request::{
    CompositionMetadata, ContentBlock, MessagePayload, OutboundRequest, SkippedDocument, Turn,
    TurnRole,
};

// ── Types ─────────────────────────────────────────────────────────────────

/// All inputs required by the composer for a single model call.
pub struct ComposeInput<'a> {
    /// Transcript entries preceding the new message, in order.
    pub history: &'a [ConversationMessage],
    /// Text of the message being sent.
    pub message: &'a str,
    /// Active document set.
    pub documents: &'a [ReferenceDocument],
    /// Optional image for the new message, as a data URI.
    pub image: Option<&'a str>,
}

/// Builds [`OutboundRequest`]s around a fixed grounding policy.
#[derive(Debug, Clone)]
pub struct ContextComposer {
    policy: String,
}

impl Default for ContextComposer {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

impl ContextComposer {
    /// Composer using a custom grounding policy.
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
        }
    }

    /// Composer using the built-in grounding policy.
    pub fn with_default_policy() -> Self {
        Self::new(policy::GROUNDING_POLICY)
    }

    /// Compose the request for one call.
    ///
    /// Fails with `MalformedAttachment` when any attachment or PDF payload
    /// cannot be decoded; there is no partial request in that case.
    /// Documents of an unsupported type are skipped and listed in the
    /// metadata.
    pub fn compose(&self, input: &ComposeInput<'_>) -> Result<OutboundRequest> {
        let mut metadata = CompositionMetadata::default();
        let classified = classifier::classify(input.documents);

        for rejected in &classified.rejected {
            metadata.skipped_documents.push(SkippedDocument {
                id: rejected.document.id.clone(),
                name: rejected.document.name.clone(),
                reason: rejected.error.to_string(),
            });
        }

        // ── Layer 1: System instruction ──
        let system_instruction = self.build_system_instruction(input.documents, &classified);
        metadata.text_documents = classified.text.len();

        // ── Layer 2: History ──
        let mut history = Vec::with_capacity(input.history.len());
        for message in input.history {
            if !message.is_model_visible() {
                metadata.system_entries_skipped += 1;
                continue;
            }
            history.push(history_turn(message)?);
        }
        metadata.history_turns = history.len();

        // ── Layer 3: Leading PDF context ──
        let leading_context = build_pdf_context(&classified.pdf)?;
        metadata.pdf_documents = classified.pdf.len();

        // ── Layer 4: New turn ──
        let new_turn = match input.image {
            Some(uri) => MessagePayload::TextWithBinary {
                text: input.message.to_string(),
                binary: codec::decode(uri)?,
            },
            None => MessagePayload::TextOnly {
                text: input.message.to_string(),
            },
        };

        metadata.estimated_tokens = token::estimate_tokens(&system_instruction)
            + leading_context.iter().map(token::estimate_turn_tokens).sum::<usize>()
            + token::estimate_turns_tokens(&history)
            + new_turn
                .to_blocks()
                .iter()
                .map(token::estimate_block_tokens)
                .sum::<usize>();

        Ok(OutboundRequest {
            system_instruction,
            history,
            leading_context,
            new_turn,
            metadata,
        })
    }

    fn build_system_instruction(
        &self,
        documents: &[ReferenceDocument],
        classified: &Classified<'_>,
    ) -> String {
        let mut instruction = String::with_capacity(
            self.policy.len() + classified.text.iter().map(|d| d.content.len() + 64).sum::<usize>(),
        );
        instruction.push_str(&self.policy);
        instruction.push_str(policy::STATUS_HEADER);
        instruction.push('\n');

        if documents.is_empty() {
            instruction.push_str(policy::NO_DOCUMENTS_NOTICE);
        } else {
            let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
            instruction.push_str(policy::LOADED_DOCUMENTS_PREFIX);
            instruction.push_str(&names.join(", "));
        }

        if !classified.text.is_empty() {
            instruction.push_str("\n\n");
            instruction.push_str(policy::TEXT_SECTION_START);
            for (index, document) in classified.text.iter().enumerate() {
                instruction.push_str("\n\n");
                instruction.push_str(&policy::text_document_label(index + 1, &document.name));
                instruction.push('\n');
                instruction.push_str(&document.content);
            }
            instruction.push_str("\n\n");
            instruction.push_str(policy::TEXT_SECTION_END);
        }

        instruction
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// Convert one model-visible transcript entry. The attachment, if any,
/// precedes the text block; empty text next to an attachment is left out.
fn history_turn(message: &ConversationMessage) -> Result<Turn> {
    let role = match message.role {
        Role::Model => TurnRole::Model,
        _ => TurnRole::User,
    };
    let mut blocks = Vec::with_capacity(2);
    if let Some(uri) = &message.attachment {
        blocks.push(ContentBlock::Binary(codec::decode(uri)?));
    }
    if blocks.is_empty() || !message.content.is_empty() {
        blocks.push(ContentBlock::text(message.content.as_str()));
    }
    Ok(Turn::new(role, blocks))
}

fn build_pdf_context(pdfs: &[&ReferenceDocument]) -> Result<Option<Turn>> {
    if pdfs.is_empty() {
        return Ok(None);
    }
    let mut blocks = Vec::with_capacity(pdfs.len() + 1);
    blocks.push(ContentBlock::text(policy::pdf_context_text(pdfs.len())));
    for document in pdfs {
        blocks.push(ContentBlock::Binary(codec::decode_pdf(&document.content)?));
    }
    Ok(Some(Turn::new(TurnRole::User, blocks)))
}

// ── Tests ─────────────────────────────────────────────────────────────────

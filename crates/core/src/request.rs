//! The outbound request assembled for a single model call.
//!
//! Built fresh per call and never persisted. The role tag on a [`Turn`] has
//! no `system` variant, so local transcript annotations cannot reach the
//! model through this type.

use crate::codec::BinaryBlock;
use serde::{Deserialize, Serialize};

/// Role of a turn as understood by the model API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One block of turn content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Binary(BinaryBlock),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

/// A role-tagged sequence of content blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub blocks: Vec<ContentBlock>,
}

impl Turn {
    pub fn new(role: TurnRole, blocks: Vec<ContentBlock>) -> Self {
        Self { role, blocks }
    }

    /// Number of binary blocks in this turn.
    pub fn binary_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_binary()).count()
    }

    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Binary(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The message being sent on this call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessagePayload {
    TextOnly { text: String },
    TextWithBinary { text: String, binary: BinaryBlock },
}

impl MessagePayload {
    pub fn text(&self) -> &str {
        match self {
            Self::TextOnly { text } | Self::TextWithBinary { text, .. } => text,
        }
    }

    pub fn binary(&self) -> Option<&BinaryBlock> {
        match self {
            Self::TextOnly { .. } => None,
            Self::TextWithBinary { binary, .. } => Some(binary),
        }
    }

    /// Content blocks in send order: text first, then the binary block.
    /// Empty text is dropped when a binary block carries the message.
    pub fn to_blocks(&self) -> Vec<ContentBlock> {
        match self {
            Self::TextOnly { text } => vec![ContentBlock::text(text.as_str())],
            Self::TextWithBinary { text, binary } if text.is_empty() => {
                vec![ContentBlock::Binary(binary.clone())]
            }
            Self::TextWithBinary { text, binary } => vec![
                ContentBlock::text(text.as_str()),
                ContentBlock::Binary(binary.clone()),
            ],
        }
    }
}

/// Counters describing how a request was assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionMetadata {
    /// Text documents inlined into the system instruction.
    pub text_documents: usize,
    /// PDF documents carried in the leading context turn.
    pub pdf_documents: usize,
    /// Transcript entries that became history turns.
    pub history_turns: usize,
    /// Transcript entries left out because they were local annotations.
    pub system_entries_skipped: usize,
    /// Documents dropped for an unsupported content type.
    pub skipped_documents: Vec<SkippedDocument>,
    /// Rough token estimate of the whole request.
    #[serde(default)]
    pub estimated_tokens: usize,
}

/// A document left out of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub id: String,
    pub name: String,
    pub reason: String,
}

/// Everything the model client needs for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRequest {
    /// Grounding policy, document status block, and inlined text documents.
    pub system_instruction: String,
    /// Prior turns derived from the transcript, in transcript order.
    pub history: Vec<Turn>,
    /// Synthetic first turn carrying every PDF, present only when PDFs are active.
    pub leading_context: Option<Turn>,
    /// The message to send.
    pub new_turn: MessagePayload,
    #[serde(default)]
    pub metadata: CompositionMetadata,
}

impl OutboundRequest {
    /// Prior turns in the order they must be transmitted:
    /// the leading context turn (if any) followed by the history.
    pub fn prior_turns(&self) -> Vec<Turn> {
        self.leading_context
            .iter()
            .chain(self.history.iter())
            .cloned()
            .collect()
    }
}

//! Conversation transcript types.
//!
//! A transcript is the append-only, ordered list of [`ConversationMessage`]s
//! shown to the user. Entries with [`Role::System`] are local annotations
//! (connection errors, missing-key prompts) and never leave the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The generative model
    Model,
    /// Local UI annotation, never sent to the model
    System,
}

/// A single entry in the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique message ID
    pub id: String,

    /// Who wrote this entry
    pub role: Role,

    /// The text content (may be empty when an attachment is present)
    pub content: String,

    /// Creation instant
    pub timestamp: DateTime<Utc>,

    /// Optional image as a `data:<mime>;base64,<payload>` URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

impl ConversationMessage {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            attachment: None,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new model reply.
    pub fn model(content: impl Into<String>) -> Self {
        Self::with_role(Role::Model, content)
    }

    /// Create a local system annotation.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Attach an image data URI.
    pub fn with_attachment(mut self, data_uri: impl Into<String>) -> Self {
        self.attachment = Some(data_uri.into());
        self
    }

    /// Whether this entry may be sent to the model.
    pub fn is_model_visible(&self) -> bool {
        self.role != Role::System
    }
}

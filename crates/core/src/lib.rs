//! # Agen RP Core
//!
//! Domain types, traits, and error definitions for the Agen RP assistant,
//! which answers development-plan questions strictly from uploaded documents.
//! This crate performs **no I/O**: it defines the domain model that all
//! other crates implement against.
//!
//! ## Design Philosophy
//!
//! External collaborators (the model API, the document backend) are traits
//! here. Implementations live in their respective crates, so the session
//! logic can be exercised with stubs and the backends swapped by configuration.

pub mod codec;
pub mod document;
pub mod error;
pub mod message;
pub mod provider;
pub mod request;
pub mod storage;

// Re-export key types at crate root for ergonomics
pub use codec::BinaryBlock;
pub use document::{DocumentKind, DocumentSet, DocumentSource, ReferenceDocument};
pub use error::{Error, FailureKind, ProviderError, Result, StorageError};
pub use message::{ConversationMessage, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use request::{
    CompositionMetadata, ContentBlock, MessagePayload, OutboundRequest, SkippedDocument, Turn,
    TurnRole,
};
pub use storage::{DocumentRecord, DocumentStore, NewDocumentRecord, StoredObject, UploadFile};

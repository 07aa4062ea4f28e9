//! Document-grounded chat for Agen RP.
//!
//! A [`ChatSession`] owns the transcript and the active documents. For every
//! message it:
//!
//! 1. **Composes** an outbound request ([`ContextComposer`]): grounding
//!    policy, document status, inlined text documents, PDF context turn,
//!    history without local notices
//! 2. **Sends** it through the configured provider
//! 3. **Appends** exactly one entry: the reply, or a `system` notice
//!    describing the failure

pub mod context;
pub mod notices;
pub mod session;

pub use context::{Classified, ComposeInput, ContextComposer, Rejected, classify};
pub use session::ChatSession;

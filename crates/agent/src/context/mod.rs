//! Request composition for a single model call.
//!
//! | Part | Source | Carried as |
//! |------|--------|------------|
//! | Grounding policy | [`policy::GROUNDING_POLICY`] or config override | System instruction |
//! | Document status | Active document names | System instruction |
//! | Text documents | `text/plain` documents | System instruction |
//! | PDF documents | `application/pdf` documents | Leading `user` turn |
//! | History | Transcript minus `system` entries | Prior turns |
//! | New message | User text + optional image | Message to send |

pub mod classifier;
pub mod composer;
pub mod policy;
pub mod token;

pub use classifier::{Classified, Rejected, classify};
pub use composer::{ComposeInput, ContextComposer};

//! Document storage and loading for Agen RP.
//!
//! Backends implement the `agenrp_core::DocumentStore` trait:
//! - **supabase**: Storage bucket + PostgREST metadata table
//! - **in_memory**: for tests and offline runs
//!
//! The [`local`] and [`remote`] modules turn files and stored objects into
//! `ReferenceDocument`s.

pub mod in_memory;
pub mod local;
pub mod remote;
pub mod supabase;

pub use in_memory::InMemoryStore;
pub use local::{load_image_attachment, load_local_document, upload_file_from_path};
pub use remote::{FailedDownload, RemoteDocuments, load_remote_documents, upload_document};
pub use supabase::SupabaseStore;

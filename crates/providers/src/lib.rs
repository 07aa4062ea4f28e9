//! Generative-model providers for Agen RP.
//!
//! All providers implement the `agenrp_core::Provider` trait.
//! [`build_from_config`] resolves the API key and builds the configured one.

pub mod factory;
pub mod gemini;

pub use factory::build_from_config;
pub use gemini::GeminiProvider;

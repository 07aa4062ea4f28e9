//! Provider construction from configuration.

use crate::gemini::GeminiProvider;
use agenrp_config::AppConfig;
use agenrp_core::error::Result;
use agenrp_core::provider::Provider;
use std::sync::Arc;
use tracing::debug;

/// Build the model client.
///
/// `explicit_key` is a key supplied for this run (e.g. `--api-key`); it wins
/// over the environment, the cached key and the build-time default. Fails
/// with `MissingCredential` when none of them is usable.
pub fn build_from_config(
    config: &AppConfig,
    explicit_key: Option<String>,
) -> Result<Arc<dyn Provider>> {
    let api_key = config.credentials(explicit_key).resolve()?;

    let mut provider = GeminiProvider::new(api_key);
    if let Some(url) = config.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        debug!(base_url = %url, "Using custom Gemini endpoint");
        provider = provider.with_base_url(url);
    }

    Ok(Arc::new(provider))
}

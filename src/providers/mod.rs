//! AI completion providers.

use std::sync::Arc;

pub mod gemini;
pub mod provider;

pub use provider::{CompletionProvider, ProviderError, Result, Role, Turn};

use crate::config::Settings;

/// Build the completion provider described by the settings.
pub fn create_provider(settings: &Settings) -> Arc<dyn CompletionProvider> {
    let mut provider = gemini::GeminiProvider::new(settings.gemini_api_key.clone())
        .with_model(settings.gemini_model.clone());
    if let Some(url) = &settings.gemini_base_url {
        provider = provider.with_base_url(url.clone());
    }
    if settings.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; AI replies will fail until it is configured");
    }
    Arc::new(provider)
}

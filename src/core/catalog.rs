//! Built-in model catalog
//!
//! This module handles loading the built-in provider and model tables from
//! the builtin_models.toml file embedded at build time, and answers the
//! derived questions the configuration store asks: per-model token
//! ceilings, per-provider defaults, and default temperatures.

use serde::Deserialize;

use crate::core::participant::Provider;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogModel {
    pub id: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProvider {
    pub id: String,
    pub display_name: String,
    pub default_model: String,
    pub default_temperature: f64,
    pub models: Vec<CatalogModel>,
}

#[derive(Debug, Deserialize)]
struct ModelCatalogConfig {
    fallback_max_tokens: u32,
    providers: Vec<CatalogProvider>,
}

/// Starting values a participant takes when switched to a provider.
#[derive(Debug, Clone)]
pub struct ProviderDefaults {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

fn load_catalog() -> ModelCatalogConfig {
    const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

    toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml")
}

/// Load the built-in providers from the embedded configuration.
pub fn load_builtin_providers() -> Vec<CatalogProvider> {
    load_catalog().providers
}

/// Find a built-in provider entry by ID (case-insensitive).
pub fn find_builtin_provider(id: &str) -> Option<CatalogProvider> {
    load_builtin_providers()
        .into_iter()
        .find(|p| p.id.eq_ignore_ascii_case(id))
}

/// Maximum output tokens allowed for a model. Unknown models fall back to
/// the catalog's conservative default.
pub fn max_token_limit(model: &str) -> u32 {
    let catalog = load_catalog();
    catalog
        .providers
        .iter()
        .flat_map(|provider| provider.models.iter())
        .find(|m| m.id == model)
        .map(|m| m.max_tokens)
        .unwrap_or(catalog.fallback_max_tokens)
}

/// Default temperature derived from the model name. The gpt-5 family pins
/// temperature at 1.0; everything else starts at 0.7.
pub fn default_temperature(model: &str) -> f64 {
    if temperature_is_fixed(model) {
        1.0
    } else {
        0.7
    }
}

/// Whether the model only accepts its fixed temperature. UI layers use
/// this to disable the temperature control.
pub fn temperature_is_fixed(model: &str) -> bool {
    model.starts_with("gpt-5")
}

/// Defaults applied when a participant is switched to `provider`. `None`
/// for providers outside the built-in catalog.
pub fn provider_defaults(provider: &Provider) -> Option<ProviderDefaults> {
    let entry = find_builtin_provider(provider.as_str())?;
    let max_tokens = entry
        .models
        .iter()
        .find(|m| m.id == entry.default_model)
        .map(|m| m.max_tokens)?;

    Some(ProviderDefaults {
        model: entry.default_model,
        temperature: entry.default_temperature,
        max_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_providers() {
        let providers = load_builtin_providers();
        assert!(!providers.is_empty());

        let provider_ids: Vec<&str> = providers.iter().map(|p| p.id.as_str()).collect();
        assert!(provider_ids.contains(&"openai"));
        assert!(provider_ids.contains(&"anthropic"));
    }

    #[test]
    fn test_find_builtin_provider() {
        // Case-insensitive lookup
        let provider = find_builtin_provider("OpenAI");
        assert!(provider.is_some());
        assert_eq!(provider.unwrap().id, "openai");

        let provider = find_builtin_provider("anthropic");
        assert!(provider.is_some());
        assert_eq!(provider.unwrap().display_name, "Anthropic");

        assert!(find_builtin_provider("nonexistent").is_none());
    }

    #[test]
    fn test_token_ceilings() {
        assert_eq!(max_token_limit("gpt-4.1"), 30000);
        assert_eq!(max_token_limit("gpt-4o"), 16384);
        assert_eq!(max_token_limit("gpt-4-turbo"), 4096);
        assert_eq!(max_token_limit("claude-4-sonnet-20250514"), 64000);
        assert_eq!(max_token_limit("claude-3-5-haiku-20241022"), 8192);

        // Unknown models get the conservative fallback
        assert_eq!(max_token_limit("some-future-model"), 4096);
    }

    #[test]
    fn test_default_temperature() {
        assert_eq!(default_temperature("gpt-4.1"), 0.7);
        assert_eq!(default_temperature("claude-4-sonnet-20250514"), 0.7);
        assert_eq!(default_temperature("gpt-5"), 1.0);
        assert_eq!(default_temperature("gpt-5-mini"), 1.0);

        assert!(temperature_is_fixed("gpt-5-turbo"));
        assert!(!temperature_is_fixed("gpt-4o"));
    }

    #[test]
    fn test_provider_defaults() {
        let openai = provider_defaults(&Provider::OpenAi).unwrap();
        assert_eq!(openai.model, "gpt-4.1");
        assert_eq!(openai.temperature, 1.0);
        assert_eq!(openai.max_tokens, 30000);

        let anthropic = provider_defaults(&Provider::Anthropic).unwrap();
        assert_eq!(anthropic.model, "claude-4-sonnet-20250514");
        assert_eq!(anthropic.temperature, 0.7);
        assert_eq!(anthropic.max_tokens, 64000);

        assert!(provider_defaults(&Provider::Other("mistral".into())).is_none());
    }

    #[test]
    fn test_default_models_have_catalog_entries() {
        for provider in load_builtin_providers() {
            assert!(
                provider.models.iter().any(|m| m.id == provider.default_model),
                "default model for {} missing from its model list",
                provider.id
            );
        }
    }
}

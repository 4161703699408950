use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::catalog;

/// Upstream API provider backing a participant.
///
/// Two providers are known to the catalog; anything else round-trips as an
/// opaque identifier so configurations from newer peers still import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    #[serde(untagged)]
    Other(String),
}

impl Provider {
    pub fn as_str(&self) -> &str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Other(id) => id,
        }
    }
}

/// Open bag of provider-specific options (capability toggles, verbosity
/// levels, and similar). The values are forwarded verbatim in the request
/// body and never interpreted by this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureBag(BTreeMap<String, Value>);

impl FeatureBag {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when the flag is present and set to boolean `true`.
    pub fn enabled(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    /// Set a flag. A `null` value removes the key instead of forwarding it.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if value.is_null() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// One configured chat participant.
///
/// Serialized field names match the wire/export convention (`maxTokens`,
/// `systemPrompt`), with feature flags flattened alongside the core fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(flatten, default)]
    pub features: FeatureBag,
}

impl Participant {
    /// Build a participant from a provider's catalog defaults.
    ///
    /// Unknown providers keep an empty model with the fallback token
    /// ceiling; the caller is expected to set a model afterwards.
    pub fn with_provider_defaults(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: Provider,
    ) -> Self {
        let defaults = catalog::provider_defaults(&provider);
        let (model, temperature, max_tokens) = match defaults {
            Some(d) => (d.model, d.temperature, d.max_tokens),
            None => (String::new(), catalog::default_temperature(""), catalog::max_token_limit("")),
        };
        Self {
            id: id.into(),
            name: name.into(),
            provider,
            model,
            temperature,
            max_tokens,
            system_prompt: None,
            features: FeatureBag::default(),
        }
    }
}

/// A single-field update applied through
/// [`MultiChatConfig::update_participant`], which owns the cascade rules
/// for provider and model changes.
///
/// [`MultiChatConfig::update_participant`]: crate::core::config::MultiChatConfig::update_participant
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipantUpdate {
    Name(String),
    Provider(Provider),
    Model(String),
    Temperature(f64),
    MaxTokens(u32),
    SystemPrompt(Option<String>),
    Feature(String, Value),
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::catalog;
use crate::core::participant::{Participant, ParticipantUpdate, Provider};
use crate::core::preset;

/// Errors that can occur when mutating or importing a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The imported text was not valid configuration JSON.
    Parse(serde_json::Error),
    /// The configuration could not be serialized for export.
    Serialize(serde_json::Error),
    /// An imported configuration carried no participants.
    EmptyParticipants,
    /// The requested preset is not a built-in.
    UnknownPreset { input: String, available: Vec<String> },
    /// The participant index does not exist.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "invalid configuration JSON: {err}"),
            ConfigError::Serialize(err) => write!(f, "failed to serialize configuration: {err}"),
            ConfigError::EmptyParticipants => {
                write!(f, "configuration must contain at least one participant")
            }
            ConfigError::UnknownPreset { input, available } => write!(
                f,
                "Preset '{}' not found. Available presets: {}",
                input,
                available.join(", ")
            ),
            ConfigError::IndexOutOfRange { index, len } => {
                write!(f, "participant index {index} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) | ConfigError::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

/// The participant list a UI session edits and the client forwards.
///
/// Pure in-memory state: created with defaults or imported from JSON,
/// mutated only through the operations below, exported on demand. The list
/// is never empty; removals that would empty it are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiChatConfig {
    pub participants: Vec<Participant>,
}

impl Default for MultiChatConfig {
    fn default() -> Self {
        let gpt = Participant::with_provider_defaults(
            "participant-1",
            "GPT-4.1 Assistant",
            Provider::OpenAi,
        );
        let claude = Participant::with_provider_defaults(
            "participant-2",
            "Claude Assistant",
            Provider::Anthropic,
        );
        Self {
            participants: vec![gpt, claude],
        }
    }
}

impl MultiChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Append a fresh OpenAI-default participant and return a reference to
    /// it. The generated id is unique within the current list.
    pub fn add_participant(&mut self) -> &Participant {
        let id = self.next_participant_id();
        let name = format!("Assistant {}", self.participants.len() + 1);
        let index = self.participants.len();
        self.participants
            .push(Participant::with_provider_defaults(id, name, Provider::OpenAi));
        &self.participants[index]
    }

    /// Remove a participant by id. Returns whether a removal happened; the
    /// last remaining participant is never removed.
    pub fn remove_participant(&mut self, id: &str) -> bool {
        if self.participants.len() <= 1 {
            return false;
        }
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        self.participants.len() != before
    }

    /// Apply one field update to the participant at `index`.
    ///
    /// Changing the provider resets model, temperature, and max tokens to
    /// that provider's defaults. Changing the model re-derives the default
    /// temperature and clamps max tokens to the new model's ceiling. Direct
    /// max-token updates clamp into `1..=ceiling`.
    pub fn update_participant(
        &mut self,
        index: usize,
        update: ParticipantUpdate,
    ) -> Result<(), ConfigError> {
        let len = self.participants.len();
        let participant = self
            .participants
            .get_mut(index)
            .ok_or(ConfigError::IndexOutOfRange { index, len })?;

        match update {
            ParticipantUpdate::Name(name) => participant.name = name,
            ParticipantUpdate::Provider(provider) => {
                participant.provider = provider;
                if let Some(defaults) = catalog::provider_defaults(&participant.provider) {
                    participant.model = defaults.model;
                    participant.temperature = defaults.temperature;
                    participant.max_tokens = defaults.max_tokens;
                } else {
                    // Off-catalog provider: the model stands, but the
                    // ceiling invariant still holds.
                    participant.max_tokens = participant
                        .max_tokens
                        .min(catalog::max_token_limit(&participant.model));
                }
            }
            ParticipantUpdate::Model(model) => {
                participant.temperature = catalog::default_temperature(&model);
                participant.max_tokens = participant
                    .max_tokens
                    .min(catalog::max_token_limit(&model));
                participant.model = model;
            }
            ParticipantUpdate::Temperature(temperature) => {
                participant.temperature = temperature;
            }
            ParticipantUpdate::MaxTokens(max_tokens) => {
                participant.max_tokens =
                    max_tokens.clamp(1, catalog::max_token_limit(&participant.model));
            }
            ParticipantUpdate::SystemPrompt(system_prompt) => {
                participant.system_prompt =
                    system_prompt.filter(|prompt| !prompt.is_empty());
            }
            ParticipantUpdate::Feature(key, value) => {
                participant.features.set(key, value);
            }
        }

        Ok(())
    }

    /// Replace the whole list with a named built-in preset.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), ConfigError> {
        match preset::find_builtin_preset(name) {
            Some(preset) => {
                self.participants = preset.participants;
                Ok(())
            }
            None => Err(ConfigError::UnknownPreset {
                input: name.to_string(),
                available: preset::load_builtin_presets()
                    .into_iter()
                    .map(|p| p.id)
                    .collect(),
            }),
        }
    }

    /// Export the configuration as pretty-printed JSON.
    pub fn export(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Replace the participant list from exported JSON. On any failure the
    /// prior state is left intact. Imported token limits are clamped to
    /// each model's ceiling.
    pub fn import(&mut self, json: &str) -> Result<(), ConfigError> {
        let mut imported: MultiChatConfig =
            serde_json::from_str(json).map_err(ConfigError::Parse)?;
        if imported.participants.is_empty() {
            return Err(ConfigError::EmptyParticipants);
        }

        for participant in &mut imported.participants {
            participant.max_tokens = participant
                .max_tokens
                .clamp(1, catalog::max_token_limit(&participant.model));
        }

        self.participants = imported.participants;
        Ok(())
    }

    fn next_participant_id(&self) -> String {
        let highest = self
            .participants
            .iter()
            .filter_map(|p| p.id.strip_prefix("participant-"))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let mut next = highest + 1;
        let mut id = format!("participant-{next}");
        while self.participants.iter().any(|p| p.id == id) {
            next += 1;
            id = format!("participant-{next}");
        }
        id
    }
}

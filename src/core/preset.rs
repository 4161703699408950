use serde::Deserialize;

use crate::core::participant::Participant;

/// A named canonical participant list; applying one replaces the whole
/// configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Preset {
    pub id: String,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Deserialize)]
struct BuiltinPresetConfig {
    presets: Vec<Preset>,
}

pub fn load_builtin_presets() -> Vec<Preset> {
    const CONFIG_CONTENT: &str = include_str!("../builtins/presets.toml");
    let config: BuiltinPresetConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtins/presets.toml");
    config.presets
}

/// Find a built-in preset by ID (case-insensitive).
pub fn find_builtin_preset(id: &str) -> Option<Preset> {
    load_builtin_presets()
        .into_iter()
        .find(|p| p.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    #[test]
    fn load_has_expected_builtins() {
        let presets = load_builtin_presets();
        let ids: Vec<String> = presets.iter().map(|p| p.id.clone()).collect();
        assert!(ids.contains(&"claude-duo".to_string()));
        assert!(ids.contains(&"gpt-duo".to_string()));
        assert!(ids.contains(&"mixed-trio".to_string()));
    }

    #[test]
    fn presets_are_nonempty_and_within_ceilings() {
        for preset in load_builtin_presets() {
            assert!(!preset.participants.is_empty(), "preset {} is empty", preset.id);
            for participant in &preset.participants {
                assert!(
                    participant.max_tokens <= catalog::max_token_limit(&participant.model),
                    "{} exceeds the ceiling for {}",
                    participant.id,
                    participant.model
                );
            }
        }
    }

    #[test]
    fn mixed_trio_has_three_participants() {
        let preset = find_builtin_preset("mixed-trio").unwrap();
        assert_eq!(preset.participants.len(), 3);
        assert_eq!(preset.participants[0].model, "gpt-4.1");
    }
}

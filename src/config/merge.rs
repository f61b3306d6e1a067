use std::path::PathBuf;

use super::{Config, ConfigLayer};

pub const DATA_DIR_ENV: &str = "CONTACTS_DATA_DIR";
pub const EDITOR_ENV: &str = "CONTACTS_EDITOR";

pub fn merge_layers(layers: impl IntoIterator<Item = ConfigLayer>) -> Config {
    let mut config = Config::default();
    for layer in layers {
        layer.apply_to(&mut config);
    }
    config
}

pub fn apply_env_overrides(config: &mut Config) {
    apply_env_overrides_from(config, |key| std::env::var(key).ok());
}

/// Env layer with an injectable lookup.
pub fn apply_env_overrides_from(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| {
        lookup(key)
            .map(|raw| raw.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(dir) = non_empty(DATA_DIR_ENV) {
        config.path = PathBuf::from(dir);
    }

    if let Some(editor) = non_empty(EDITOR_ENV).or_else(|| non_empty("EDITOR")) {
        config.editor = editor;
    }
}

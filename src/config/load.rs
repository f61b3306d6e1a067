use std::fs;
use std::path::{Path, PathBuf};

use super::merge::{apply_env_overrides, merge_layers};
use super::{Config, ConfigError, ConfigLayer};

fn config_path() -> PathBuf {
    crate::paths::config_dir().join("config.toml")
}

pub fn load_user_config(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

/// Defaults, then the user file, then the environment.
pub fn load() -> Result<Config, ConfigError> {
    load_from(&config_path())
}

fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let user = load_user_config(path)?;
    let mut config = merge_layers(user);
    apply_env_overrides(&mut config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::config::{FileLoggingConfig, LogFormat, LogRotation, LoggingConfig};

    #[test]
    fn full_user_file_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let cfg = Config {
            path: PathBuf::from("/srv/contacts"),
            working_data: PathBuf::from("people.json"),
            editor: "code --wait".into(),
            logging: LoggingConfig {
                stderr: false,
                stderr_format: LogFormat::Tree,
                filter: Some("debug".into()),
                file: FileLoggingConfig {
                    enabled: true,
                    dir: Some(PathBuf::from("/tmp/contacts-test-logs")),
                    format: LogFormat::Json,
                    rotation: LogRotation::Hourly,
                    retention_max_age_days: Some(3),
                    retention_max_files: Some(7),
                },
            },
            ..Config::default()
        };
        fs::write(&path, toml::to_string_pretty(&cfg).expect("render config"))
            .expect("write config");
        let layer = load_user_config(&path).expect("load").expect("layer");
        let mut loaded = Config::default();
        layer.apply_to(&mut loaded);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_user_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layer = load_user_config(&dir.path().join("config.toml")).expect("load");
        assert!(layer.is_none());
    }

    #[test]
    fn partial_user_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "editor = \"nano\"\n\n[logging]\nstderr_format = \"json\"\n",
        )
        .expect("write");
        let layer = load_user_config(&path).expect("load").expect("layer");
        let mut config = Config::default();
        layer.apply_to(&mut config);
        assert_eq!(config.editor, "nano");
        assert_eq!(config.logging.stderr_format, LogFormat::Json);
        assert_eq!(config.working_data, PathBuf::from("contacts.json"));
    }

    #[test]
    fn malformed_user_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "editor = [").expect("write");
        let err = load_user_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}

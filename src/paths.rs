//! XDG directory helpers for config/data/log locations.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "contacts";

/// Base directory for contact documents.
///
/// Uses `CONTACTS_DATA_DIR` if set, otherwise `$XDG_DATA_HOME/contacts` or
/// `~/.local/share/contacts`.
pub fn data_dir() -> PathBuf {
    resolve_dir(
        env_var("CONTACTS_DATA_DIR"),
        env_var("XDG_DATA_HOME"),
        dirs::home_dir(),
        &[".local", "share"],
    )
}

/// Base directory for configuration files.
///
/// Uses `CONTACTS_CONFIG_DIR` if set, otherwise `$XDG_CONFIG_HOME/contacts`
/// or `~/.config/contacts`.
pub fn config_dir() -> PathBuf {
    resolve_dir(
        env_var("CONTACTS_CONFIG_DIR"),
        env_var("XDG_CONFIG_HOME"),
        dirs::home_dir(),
        &[".config"],
    )
}

/// Directory for rolling log files: `CONTACTS_LOG_DIR` or `<data>/logs`.
pub fn log_dir() -> PathBuf {
    env_var("CONTACTS_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join("logs"))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// `explicit` wins outright; otherwise `<xdg>/contacts`, otherwise
/// `<home>/<fallback...>/contacts`.
fn resolve_dir(
    explicit: Option<String>,
    xdg: Option<String>,
    home: Option<PathBuf>,
    fallback: &[&str],
) -> PathBuf {
    if let Some(dir) = explicit.filter(|dir| !dir.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    xdg.filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = home.unwrap_or_else(|| PathBuf::from("/tmp"));
            fallback
                .iter()
                .fold(home, |dir, part| dir.join(Path::new(part)))
        })
        .join(APP_DIR)
}

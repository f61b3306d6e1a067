use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKING_DATA: &str = "contacts.json";
pub const DEFAULT_BACKUP_DATA: &str = "contacts.json.bak";
pub const DEFAULT_DELETED_DATA: &str = "contacts_deleted.json";
pub const DEFAULT_BACKUP_DELETED_DATA: &str = "contacts_deleted.json.bak";
pub const DEFAULT_TMP_EDIT_PATH: &str = "edit_tmp";
pub const DEFAULT_EDITOR: &str = "vim";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory; relative document paths resolve against it.
    pub path: PathBuf,
    pub working_data: PathBuf,
    pub backup_data: PathBuf,
    pub deleted_data: PathBuf,
    pub backup_deleted_data: PathBuf,
    pub tmp_edit_path: PathBuf,
    pub editor: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: crate::paths::data_dir(),
            working_data: PathBuf::from(DEFAULT_WORKING_DATA),
            backup_data: PathBuf::from(DEFAULT_BACKUP_DATA),
            deleted_data: PathBuf::from(DEFAULT_DELETED_DATA),
            backup_deleted_data: PathBuf::from(DEFAULT_BACKUP_DELETED_DATA),
            tmp_edit_path: PathBuf::from(DEFAULT_TMP_EDIT_PATH),
            editor: DEFAULT_EDITOR.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Document locations with relative entries joined onto `path`.
    pub fn data_paths(&self) -> DataPaths {
        DataPaths {
            working: self.resolve(&self.working_data),
            working_snapshot: self.resolve(&self.backup_data),
            deleted: self.resolve(&self.deleted_data),
            deleted_snapshot: self.resolve(&self.backup_deleted_data),
            tmp_edit: self.resolve(&self.tmp_edit_path),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub working: PathBuf,
    pub working_snapshot: PathBuf,
    pub deleted: PathBuf,
    pub deleted_snapshot: PathBuf,
    pub tmp_edit: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Tree,
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRotation {
    Daily,
    Hourly,
    Minutely,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub stderr: bool,
    pub stderr_format: LogFormat,
    pub filter: Option<String>,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stderr: true,
            stderr_format: LogFormat::Compact,
            filter: None,
            file: FileLoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub rotation: LogRotation,
    pub retention_max_age_days: Option<u64>,
    pub retention_max_files: Option<usize>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: None,
            format: LogFormat::Json,
            rotation: LogRotation::Daily,
            retention_max_age_days: Some(7),
            retention_max_files: Some(10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfigOverride {
    pub stderr: Option<bool>,
    pub stderr_format: Option<LogFormat>,
    pub filter: Option<String>,
    pub file: Option<FileLoggingConfigOverride>,
}

impl LoggingConfigOverride {
    pub fn apply_to(&self, target: &mut LoggingConfig) {
        if let Some(stderr) = self.stderr {
            target.stderr = stderr;
        }
        if let Some(format) = self.stderr_format {
            target.stderr_format = format;
        }
        if let Some(filter) = self.filter.as_ref() {
            target.filter = Some(filter.clone());
        }
        if let Some(file) = self.file.as_ref() {
            file.apply_to(&mut target.file);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileLoggingConfigOverride {
    pub enabled: Option<bool>,
    pub dir: Option<PathBuf>,
    pub format: Option<LogFormat>,
    pub rotation: Option<LogRotation>,
    pub retention_max_age_days: Option<u64>,
    pub retention_max_files: Option<usize>,
}

impl FileLoggingConfigOverride {
    pub fn apply_to(&self, target: &mut FileLoggingConfig) {
        if let Some(enabled) = self.enabled {
            target.enabled = enabled;
        }
        if let Some(dir) = self.dir.as_ref() {
            target.dir = Some(dir.clone());
        }
        if let Some(format) = self.format {
            target.format = format;
        }
        if let Some(rotation) = self.rotation {
            target.rotation = rotation;
        }
        if let Some(days) = self.retention_max_age_days {
            target.retention_max_age_days = Some(days);
        }
        if let Some(files) = self.retention_max_files {
            target.retention_max_files = Some(files);
        }
    }
}

/// One partial configuration source. Every field is optional; a set field
/// replaces the value underneath it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigLayer {
    pub path: Option<PathBuf>,
    pub working_data: Option<PathBuf>,
    pub backup_data: Option<PathBuf>,
    pub deleted_data: Option<PathBuf>,
    pub backup_deleted_data: Option<PathBuf>,
    pub tmp_edit_path: Option<PathBuf>,
    pub editor: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfigOverride,
}

impl ConfigLayer {
    pub fn apply_to(&self, base: &mut Config) {
        if let Some(path) = &self.path {
            base.path = path.clone();
        }
        let documents = [
            (&self.working_data, &mut base.working_data),
            (&self.backup_data, &mut base.backup_data),
            (&self.deleted_data, &mut base.deleted_data),
            (&self.backup_deleted_data, &mut base.backup_deleted_data),
            (&self.tmp_edit_path, &mut base.tmp_edit_path),
        ];
        for (layer, target) in documents {
            if let Some(value) = layer {
                *target = value.clone();
            }
        }
        if let Some(editor) = &self.editor {
            base.editor = editor.clone();
        }
        self.logging.apply_to(&mut base.logging);
    }
}

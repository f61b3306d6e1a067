//! External editor collaborator.
//!
//! The store hands one serialized contact to an [`Editor`] and gets a
//! re-parsed contact back. [`ProcessEditor`] does this through a temp file
//! and a blocking editor subprocess.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::Result;
use crate::core::Contact;
use crate::store::{parse_contact, to_json};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EditError {
    #[error("no editor configured")]
    NoEditor,

    #[error("failed to launch editor `{editor}`: {source}")]
    Spawn {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor `{editor}` exited with {status}; contact left unchanged")]
    Aborted { editor: String, status: String },

    #[error("edit file {path}: {source}")]
    TempFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait Editor {
    fn edit(&self, contact: &Contact) -> Result<Contact>;
}

#[derive(Debug, Clone)]
pub struct ProcessEditor {
    command: String,
    tmp_path: PathBuf,
}

impl ProcessEditor {
    /// `command` may carry arguments (`"code --wait"`); the temp file path
    /// is appended last.
    pub fn new(command: impl Into<String>, tmp_path: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            tmp_path: tmp_path.into(),
        }
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    fn run(&self) -> Result<()> {
        let mut words = self.command.split_whitespace();
        let program = words.next().ok_or(EditError::NoEditor)?;
        tracing::debug!(editor = %self.command, path = %self.tmp_path.display(), "launching editor");
        let status = Command::new(program)
            .args(words)
            .arg(&self.tmp_path)
            .status()
            .map_err(|source| EditError::Spawn {
                editor: self.command.clone(),
                source,
            })?;
        if !status.success() {
            return Err(EditError::Aborted {
                editor: self.command.clone(),
                status: status.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn write_tmp(&self, contact: &Contact) -> Result<()> {
        if let Some(dir) = self.tmp_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|source| EditError::TempFile {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.tmp_path, to_json(contact)?).map_err(|source| self.tmp_error(source))?;
        Ok(())
    }

    fn read_tmp(&self) -> Result<Contact> {
        let contents =
            fs::read_to_string(&self.tmp_path).map_err(|source| self.tmp_error(source))?;
        Ok(parse_contact(&self.tmp_path, &contents)?)
    }

    fn tmp_error(&self, source: std::io::Error) -> EditError {
        EditError::TempFile {
            path: self.tmp_path.clone(),
            source,
        }
    }

    fn remove_tmp(&self) {
        if let Err(err) = fs::remove_file(&self.tmp_path) {
            tracing::warn!("failed to remove {}: {err}", self.tmp_path.display());
        }
    }
}

impl Editor for ProcessEditor {
    fn edit(&self, contact: &Contact) -> Result<Contact> {
        self.write_tmp(contact)?;
        let edited = self.run().and_then(|()| self.read_tmp());
        self.remove_tmp();
        edited
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    use crate::Error;
    use crate::core::ContactId;
    use crate::store::StoreError;

    fn ann() -> Contact {
        Contact {
            uuid: ContactId::new("u-ann"),
            name: "Ann".into(),
            email: None,
            phone: None,
            tags: Some(vec!["a".into()]),
        }
    }

    #[test]
    fn successful_editor_round_trips_the_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tmp = dir.path().join("edit_tmp");
        let editor = ProcessEditor::new("true", &tmp);
        assert_eq!(editor.edit(&ann()).expect("edit"), ann());
        assert!(!tmp.exists());
    }

    #[test]
    fn failing_editor_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let editor = ProcessEditor::new("false", dir.path().join("edit_tmp"));
        let err = editor.edit(&ann()).unwrap_err();
        assert!(matches!(err, Error::Edit(EditError::Aborted { .. })));
        assert!(!editor.tmp_path().exists());
    }

    #[test]
    fn unparsable_edit_is_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tmp = dir.path().join("edit_tmp");
        let editor = ProcessEditor::new("truncate -s 0", &tmp);
        let err = editor.edit(&ann()).unwrap_err();
        assert!(matches!(
            err,
            Error::Store(StoreError::MalformedData { .. })
        ));
    }

    #[test]
    fn missing_editor_binary_fails_to_spawn() {
        let dir = tempfile::tempdir().expect("tempdir");
        let editor = ProcessEditor::new(
            "definitely-not-an-installed-editor",
            dir.path().join("edit_tmp"),
        );
        let err = editor.edit(&ann()).unwrap_err();
        assert!(matches!(err, Error::Edit(EditError::Spawn { .. })));
    }

    #[test]
    fn blank_command_has_no_editor() {
        let dir = tempfile::tempdir().expect("tempdir");
        let editor = ProcessEditor::new("  ", dir.path().join("edit_tmp"));
        let err = editor.edit(&ann()).unwrap_err();
        assert!(matches!(err, Error::Edit(EditError::NoEditor)));
    }
}

//! Whole-file JSON documents.
//!
//! A document is a top-level JSON array of contact records. Reads load the
//! full file; writes replace it wholesale. There is no temp-file rename: a
//! crash mid-write can leave a truncated document behind, which is why an
//! optional snapshot copy of the previous file is taken first.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::Contact;

use super::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    snapshot: Option<PathBuf>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: None,
        }
    }

    /// Copy the previous file to `snapshot` before every rewrite.
    pub fn with_snapshot(mut self, snapshot: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read. A missing file is an empty collection; anything present
    /// must parse and validate.
    pub fn read(&self) -> Result<Vec<Contact>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "document missing, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        parse_contacts(&self.path, &contents)
    }

    /// Read that never fails, for append-only documents such as the deleted
    /// contacts. Records are kept as stored, repeated or blank uuids
    /// included; only a missing, unreadable, or unparseable file yields an
    /// empty collection.
    pub fn read_lenient(&self) -> Vec<Contact> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!("treating {} as empty: {err}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(contacts) => contacts,
            Err(err) => {
                tracing::warn!("treating {} as empty: {err}", self.path.display());
                Vec::new()
            }
        }
    }

    pub fn write(&self, contacts: &[Contact]) -> Result<(), StoreError> {
        let rendered = to_json(contacts)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        self.take_snapshot()?;
        fs::write(&self.path, rendered).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn take_snapshot(&self) -> Result<(), StoreError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        if !self.path.exists() {
            return Ok(());
        }
        fs::copy(&self.path, snapshot).map_err(|source| StoreError::Snapshot {
            from: self.path.clone(),
            to: snapshot.clone(),
            source,
        })?;
        tracing::debug!(
            from = %self.path.display(),
            to = %snapshot.display(),
            "snapshot taken"
        );
        Ok(())
    }
}

/// Parse and validate a full document: every record needs a `name` and a
/// non-empty, unique `uuid`.
pub fn parse_contacts(path: &Path, contents: &str) -> Result<Vec<Contact>, StoreError> {
    let contacts: Vec<Contact> =
        serde_json::from_str(contents).map_err(|err| malformed(path, err.to_string()))?;
    validate_ids(path, &contacts)?;
    Ok(contacts)
}

fn validate_ids(path: &Path, contacts: &[Contact]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(contacts.len());
    for (index, contact) in contacts.iter().enumerate() {
        if contact.uuid.is_empty() {
            return Err(malformed(path, format!("record {index} has an empty uuid")));
        }
        if !seen.insert(contact.uuid.as_str()) {
            return Err(malformed(
                path,
                format!("record {index} repeats uuid {}", contact.uuid),
            ));
        }
    }
    Ok(())
}

/// Parse a single record, as handed back by an external editor.
pub fn parse_contact(path: &Path, contents: &str) -> Result<Contact, StoreError> {
    let contact: Contact =
        serde_json::from_str(contents).map_err(|err| malformed(path, err.to_string()))?;
    if contact.uuid.is_empty() {
        return Err(malformed(path, "record has an empty uuid".to_string()));
    }
    Ok(contact)
}

pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    let mut rendered = serde_json::to_string_pretty(value).map_err(StoreError::Serialize)?;
    rendered.push('\n');
    Ok(rendered)
}

fn malformed(path: &Path, reason: String) -> StoreError {
    StoreError::MalformedData {
        path: path.to_path_buf(),
        reason,
    }
}

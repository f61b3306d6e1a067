use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::{Contact, ContactId, CoreError, validation_error};

use super::StoreError;

/// A contact record as accepted by `import`: like [`Contact`] but the uuid
/// may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub uuid: Option<ContactId>,
    pub name: String,
    #[serde(default)]
    pub email: Option<Vec<String>>,
    #[serde(default)]
    pub phone: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl ImportRecord {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(validation_error("name", "imported record has an empty name"));
        }
        Ok(())
    }

    pub(super) fn into_contact(self) -> Contact {
        let uuid = self
            .uuid
            .filter(|uuid| !uuid.is_empty())
            .unwrap_or_else(ContactId::generate);
        Contact {
            uuid,
            name: self.name,
            email: self.email,
            phone: self.phone,
            tags: self.tags,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
}

pub fn read_import_file(path: &Path) -> Result<Vec<ImportRecord>, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|err| StoreError::MalformedData {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

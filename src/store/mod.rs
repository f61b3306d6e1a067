//! The contact store: load, query, mutate, persist.
//!
//! Indices handed to and returned from [`ContactStore`] are positions in the
//! current sorted ordering. Every write re-sorts, so an index is only valid
//! until the next mutation.

use std::collections::HashSet;
use std::path::Path;

use crate::Result;
use crate::core::{Contact, ContactFields, ContactId, ContactPatch, CoreError, FieldName};
use crate::edit::Editor;
use crate::prompt::Confirm;

pub mod audit;
mod document;
mod error;
mod import;

pub use document::{Document, parse_contact, parse_contacts, to_json};
pub use error::StoreError;
pub use import::{ImportRecord, ImportReport, read_import_file};

/// Result of a confirmed or declined `delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Contacts moved to the backup document and removed from the store.
    Deleted(Vec<Contact>),
    /// The user answered no; nothing was written.
    Declined,
    /// The selection was empty; nothing was asked or written.
    NothingSelected,
}

#[derive(Debug)]
pub struct ContactStore {
    document: Document,
    contacts: Vec<Contact>,
}

impl ContactStore {
    pub fn load(document: Document) -> Result<Self> {
        let mut contacts = document.read()?;
        sort_by_name(&mut contacts);
        tracing::debug!(
            path = %document.path().display(),
            count = contacts.len(),
            "contacts loaded"
        );
        Ok(Self { document, contacts })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Indices of contacts whose fields contain `text`, case-insensitively.
    /// `None` selects everything.
    pub fn query(&self, text: Option<&str>) -> Vec<usize> {
        let Some(text) = text else {
            return (0..self.contacts.len()).collect();
        };
        let needle = text.to_lowercase();
        self.contacts
            .iter()
            .enumerate()
            .filter(|(_, contact)| contact.matches_lowercase(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    /// Contacts at `indices`, in the order given.
    pub fn list_matches(&self, indices: &[usize]) -> Result<Vec<&Contact>> {
        indices
            .iter()
            .map(|&index| self.get(index).map_err(crate::Error::from))
            .collect()
    }

    pub fn add(&mut self, fields: ContactFields) -> Result<Contact> {
        fields.validate()?;
        let mut contact = Contact::create(fields);
        while self.contains_id(&contact.uuid) {
            contact.uuid = ContactId::generate();
        }
        self.contacts.push(contact.clone());
        self.overwrite()?;
        audit::added(&contact);
        Ok(contact)
    }

    /// Apply `patch` to every selected contact, then persist once.
    pub fn modify(&mut self, indices: &[usize], patch: &ContactPatch) -> Result<Vec<Contact>> {
        patch.validate()?;
        let targets = self.check_indices(indices)?;
        if targets.is_empty() {
            tracing::info!("no contacts selected, nothing to modify");
            return Ok(Vec::new());
        }

        let mut changes = Vec::with_capacity(targets.len());
        for index in targets {
            let after = self.contacts[index].patched(patch);
            let before = std::mem::replace(&mut self.contacts[index], after.clone());
            changes.push((before, after));
        }
        self.overwrite()?;
        for (before, after) in &changes {
            audit::modified(before, after);
        }
        Ok(changes.into_iter().map(|(_, after)| after).collect())
    }

    /// Move the selected contacts to `backup` after interactive confirmation.
    ///
    /// The backup is written before the live document. The two writes are not
    /// transactional: an interruption between them leaves the exiled contacts
    /// in both documents.
    pub fn delete(
        &mut self,
        indices: &[usize],
        backup: &Document,
        confirm: &mut dyn Confirm,
    ) -> Result<DeleteOutcome> {
        let targets = self.check_indices(indices)?;
        if targets.is_empty() {
            tracing::info!("no contacts selected, nothing to delete");
            return Ok(DeleteOutcome::NothingSelected);
        }

        let prompt = format!(
            "Delete {} contact(s)? Are you sure? (y/n)",
            targets.len()
        );
        if !confirm.confirm(&prompt)? {
            tracing::info!(target: audit::AUDIT_TARGET, "exiting without deletion");
            return Ok(DeleteOutcome::Declined);
        }

        let exiled: Vec<Contact> = targets
            .iter()
            .map(|&index| self.contacts[index].clone())
            .collect();
        let mut backup_contents = backup.read_lenient();
        backup_contents.extend(exiled.iter().cloned());
        backup.write(&backup_contents)?;

        let mut descending = targets;
        descending.sort_unstable_by(|a, b| b.cmp(a));
        for index in descending {
            self.contacts.remove(index);
        }
        self.overwrite()?;
        for contact in &exiled {
            audit::deleted(contact, backup.path());
        }
        Ok(DeleteOutcome::Deleted(exiled))
    }

    /// One line per selected contact; list fields are space-joined.
    pub fn get_field(&self, indices: &[usize], field: &str) -> Result<Vec<String>> {
        let field: FieldName = field.parse()?;
        Ok(self
            .list_matches(indices)?
            .into_iter()
            .map(|contact| contact.field_text(field))
            .collect())
    }

    /// Full records at `indices`, ready for serialization.
    pub fn export(&self, indices: &[usize]) -> Result<Vec<Contact>> {
        Ok(self
            .list_matches(indices)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Hand exactly one contact to `editor` and store what comes back.
    pub fn edit(&mut self, indices: &[usize], editor: &dyn Editor) -> Result<Contact> {
        let [index] = indices else {
            return Err(CoreError::EditTargetCount {
                count: indices.len(),
            }
            .into());
        };
        let index = *index;
        let original = self.get(index)?.clone();
        let edited = editor.edit(&original)?;
        if edited.uuid != original.uuid {
            return Err(CoreError::UuidChanged {
                expected: original.uuid.to_string(),
                got: edited.uuid.to_string(),
            }
            .into());
        }
        if edited.name.trim().is_empty() {
            return Err(crate::core::validation_error("name", "name cannot be empty").into());
        }

        self.contacts[index] = edited.clone();
        self.overwrite()?;
        audit::modified(&original, &edited);
        Ok(edited)
    }

    /// Append imported records. Records carrying a uuid already present are
    /// skipped; records without one get a fresh uuid.
    pub fn import(&mut self, records: Vec<ImportRecord>) -> Result<ImportReport> {
        for record in &records {
            record.validate()?;
        }

        let mut report = ImportReport::default();
        let mut imported = Vec::new();
        let mut known: HashSet<ContactId> =
            self.contacts.iter().map(|c| c.uuid.clone()).collect();
        for record in records {
            if let Some(uuid) = &record.uuid
                && known.contains(uuid)
            {
                tracing::debug!(%uuid, "skipping already known contact");
                report.skipped += 1;
                continue;
            }
            let mut contact = record.into_contact();
            while known.contains(&contact.uuid) {
                contact.uuid = ContactId::generate();
            }
            known.insert(contact.uuid.clone());
            imported.push(contact.clone());
            self.contacts.push(contact);
            report.added += 1;
        }

        if report.added > 0 {
            self.overwrite()?;
        }
        for contact in &imported {
            audit::imported(contact);
        }
        Ok(report)
    }

    /// Re-sort and replace the backing document wholesale.
    pub fn overwrite(&mut self) -> Result<()> {
        sort_by_name(&mut self.contacts);
        self.document.write(&self.contacts)?;
        audit::overwritten(self.document.path(), self.contacts.len());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.document.path()
    }

    fn get(&self, index: usize) -> std::result::Result<&Contact, CoreError> {
        self.contacts.get(index).ok_or(CoreError::IndexOutOfRange {
            index,
            len: self.contacts.len(),
        })
    }

    /// Bounds-check every index up front and drop repeats, so a failing
    /// index never leaves a half-applied mutation behind.
    fn check_indices(&self, indices: &[usize]) -> std::result::Result<Vec<usize>, CoreError> {
        let mut seen = HashSet::with_capacity(indices.len());
        let mut targets = Vec::with_capacity(indices.len());
        for &index in indices {
            self.get(index)?;
            if seen.insert(index) {
                targets.push(index);
            }
        }
        Ok(targets)
    }

    fn contains_id(&self, id: &ContactId) -> bool {
        self.contacts.iter().any(|contact| &contact.uuid == id)
    }
}

fn sort_by_name(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| a.name.cmp(&b.name));
}

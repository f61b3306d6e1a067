use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{CoreError, validation_error};

/// Opaque, immutable contact identifier.
///
/// Freshly generated ids are v4 uuids, but any non-empty string read from a
/// document is accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record of the contacts document.
///
/// List fields are nullable: `None` serializes as JSON `null`, which is
/// distinct from an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub uuid: ContactId,
    pub name: String,
    #[serde(default)]
    pub email: Option<Vec<String>>,
    #[serde(default)]
    pub phone: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Contact {
    /// Build a new record with a freshly generated uuid.
    pub fn create(fields: ContactFields) -> Self {
        Self {
            uuid: ContactId::generate(),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            tags: fields.tags,
        }
    }

    /// Case-insensitive substring match over every non-null field.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.searchable_values()
            .any(|value| value.to_lowercase().contains(needle))
    }

    fn searchable_values(&self) -> impl Iterator<Item = &str> {
        let lists = [&self.email, &self.phone, &self.tags];
        [self.uuid.as_str(), self.name.as_str()]
            .into_iter()
            .chain(
                lists
                    .into_iter()
                    .flatten()
                    .flat_map(|values| values.iter().map(String::as_str)),
            )
    }

    /// Field value as a single line; list fields are space-joined and null
    /// lists render as an empty string.
    pub fn field_text(&self, field: FieldName) -> String {
        match field {
            FieldName::Name => self.name.clone(),
            FieldName::Uuid => self.uuid.to_string(),
            FieldName::Email => join_list(self.email.as_deref()),
            FieldName::Phone => join_list(self.phone.as_deref()),
            FieldName::Tags => join_list(self.tags.as_deref()),
        }
    }

    /// Replacement record: supplied patch fields win, everything else
    /// (always including `uuid`) is carried over.
    pub fn patched(&self, patch: &ContactPatch) -> Self {
        Self {
            uuid: self.uuid.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            email: patch.email.clone().or_else(|| self.email.clone()),
            phone: patch.phone.clone().or_else(|| self.phone.clone()),
            tags: patch.tags.clone().or_else(|| self.tags.clone()),
        }
    }
}

fn join_list(values: Option<&[String]>) -> String {
    values.map(|values| values.join(" ")).unwrap_or_default()
}

/// Fields supplied when creating a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: Option<Vec<String>>,
    pub phone: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl ContactFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(validation_error("name", "name cannot be empty"));
        }
        Ok(())
    }
}

/// Partial update; `None` means "keep the existing value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<Vec<String>>,
    pub phone: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.tags.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(validation_error(
                "modify",
                "nothing to modify; supply at least one of name, email, phone, tags",
            ));
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(validation_error("name", "name cannot be empty"));
        }
        Ok(())
    }
}

/// Field names accepted by `get_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Name,
    Uuid,
    Email,
    Phone,
    Tags,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Name,
        FieldName::Uuid,
        FieldName::Email,
        FieldName::Phone,
        FieldName::Tags,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Uuid => "uuid",
            FieldName::Email => "email",
            FieldName::Phone => "phone",
            FieldName::Tags => "tags",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|field| field.as_str()).collect()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == raw)
            .ok_or_else(|| CoreError::UnknownField {
                name: raw.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rick() -> Contact {
        Contact {
            uuid: ContactId::new("ca064182-6b04-11eb-844f-274375519e58"),
            name: "Rick Sanchez".into(),
            email: Some(vec!["rick.sanchez@plumbus.com".into()]),
            phone: None,
            tags: Some(vec!["a".into(), "b".into()]),
        }
    }

    #[test]
    fn matches_any_field_case_insensitively() {
        let contact = rick();
        assert!(contact.matches_lowercase("rick"));
        assert!(contact.matches_lowercase("plumbus"));
        assert!(contact.matches_lowercase("b"));
        assert!(contact.matches_lowercase("274375519e58"));
        assert!(!contact.matches_lowercase("morty"));
    }

    #[test]
    fn list_elements_are_matched_individually() {
        let contact = rick();
        assert!(!contact.matches_lowercase("a b"));
    }

    #[test]
    fn field_text_joins_lists_with_spaces() {
        let contact = rick();
        assert_eq!(contact.field_text(FieldName::Tags), "a b");
        assert_eq!(contact.field_text(FieldName::Phone), "");
        assert_eq!(
            contact.field_text(FieldName::Uuid),
            "ca064182-6b04-11eb-844f-274375519e58"
        );
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        assert_eq!("tags".parse::<FieldName>(), Ok(FieldName::Tags));
        let err = "address".parse::<FieldName>().unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownField {
                name: "address".into()
            }
        );
        assert!(err.to_string().contains("name, uuid, email, phone, tags"));
    }

    #[test]
    fn patched_keeps_uuid_and_unspecified_fields() {
        let contact = rick();
        let patch = ContactPatch {
            phone: Some(vec!["07655266089".into()]),
            ..ContactPatch::default()
        };
        let updated = contact.patched(&patch);
        assert_eq!(updated.uuid, contact.uuid);
        assert_eq!(updated.name, contact.name);
        assert_eq!(updated.email, contact.email);
        assert_eq!(updated.phone, Some(vec!["07655266089".to_string()]));
    }

    #[test]
    fn null_lists_serialize_as_null() {
        let contact = rick();
        let json = serde_json::to_value(&contact).expect("serialize");
        assert_eq!(json["phone"], serde_json::Value::Null);
        assert_eq!(json["uuid"], "ca064182-6b04-11eb-844f-274375519e58");
    }

    #[test]
    fn empty_patch_fails_validation() {
        assert!(ContactPatch::default().validate().is_err());
        assert!(ContactFields::new("  ").validate().is_err());
        assert!(ContactFields::new("Ann").validate().is_ok());
    }

    #[test]
    fn generated_ids_are_unique_and_non_empty() {
        let a = ContactId::generate();
        let b = ContactId::generate();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}

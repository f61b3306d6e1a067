//! Human-readable audit lines for store mutations.
//!
//! Emitted as `tracing` events on [`AUDIT_TARGET`] so they land on the
//! diagnostic stream, never on stdout.

use crate::core::Contact;

pub const AUDIT_TARGET: &str = "contacts::audit";

pub fn added(contact: &Contact) {
    tracing::info!(target: AUDIT_TARGET, uuid = %contact.uuid, "adding contact ... {}", describe(contact));
}

pub fn modified(before: &Contact, after: &Contact) {
    let changes = describe_changes(before, after);
    if changes.is_empty() {
        tracing::info!(target: AUDIT_TARGET, uuid = %after.uuid, "contact {} unchanged", after.name);
        return;
    }
    tracing::info!(
        target: AUDIT_TARGET,
        uuid = %after.uuid,
        "modifying contact {} ... {}",
        before.name,
        changes.join("; ")
    );
}

pub fn deleted(contact: &Contact, backup: &std::path::Path) {
    tracing::info!(
        target: AUDIT_TARGET,
        uuid = %contact.uuid,
        "exiling contact {} to ... {}",
        contact.name,
        backup.display()
    );
}

pub fn imported(contact: &Contact) {
    tracing::info!(target: AUDIT_TARGET, uuid = %contact.uuid, "importing contact ... {}", describe(contact));
}

pub fn overwritten(path: &std::path::Path, count: usize) {
    tracing::info!(target: AUDIT_TARGET, count, "overwriting ... {}", path.display());
}

/// One-line rendering of a full record.
pub fn describe(contact: &Contact) -> String {
    format!(
        "{} <{}> email={} phone={} tags={}",
        contact.name,
        contact.uuid,
        describe_list(contact.email.as_deref()),
        describe_list(contact.phone.as_deref()),
        describe_list(contact.tags.as_deref()),
    )
}

/// Field-by-field diff, one `field: old -> new` entry per changed field.
pub fn describe_changes(before: &Contact, after: &Contact) -> Vec<String> {
    let mut changes = Vec::new();
    if before.name != after.name {
        changes.push(format!("name: {:?} -> {:?}", before.name, after.name));
    }
    let lists = [
        ("email", &before.email, &after.email),
        ("phone", &before.phone, &after.phone),
        ("tags", &before.tags, &after.tags),
    ];
    for (field, old, new) in lists {
        if old != new {
            changes.push(format!(
                "{field}: {} -> {}",
                describe_list(old.as_deref()),
                describe_list(new.as_deref())
            ));
        }
    }
    changes
}

fn describe_list(values: Option<&[String]>) -> String {
    match values {
        None => "null".to_string(),
        Some(values) => format!("[{}]", values.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::{ContactId, ContactPatch};

    fn ann() -> Contact {
        Contact {
            uuid: ContactId::new("u-1"),
            name: "Ann".into(),
            email: Some(vec!["ann@example.com".into()]),
            phone: None,
            tags: Some(Vec::new()),
        }
    }

    #[test]
    fn describe_renders_null_and_empty_lists_distinctly() {
        assert_eq!(
            describe(&ann()),
            "Ann <u-1> email=[ann@example.com] phone=null tags=[]"
        );
    }

    #[test]
    fn describe_changes_lists_only_changed_fields() {
        let before = ann();
        let after = before.patched(&ContactPatch {
            name: Some("Ann Smith".into()),
            phone: Some(vec!["123".into(), "456".into()]),
            ..ContactPatch::default()
        });
        assert_eq!(
            describe_changes(&before, &after),
            vec![
                "name: \"Ann\" -> \"Ann Smith\"".to_string(),
                "phone: null -> [123, 456]".to_string(),
            ]
        );
        assert!(describe_changes(&before, &before).is_empty());
    }
}

//! Contact records and their validation rules. No I/O lives here.

mod contact;
mod error;

pub use contact::{Contact, ContactFields, ContactId, ContactPatch, FieldName};
pub use error::{CoreError, validation_error};

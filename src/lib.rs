#![forbid(unsafe_code)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod edit;
pub mod error;
pub mod paths;
pub mod prompt;
pub mod store;
pub mod telemetry;

pub use error::{Effect, Error};
pub type Result<T> = std::result::Result<T, Error>;

pub use crate::core::{Contact, ContactFields, ContactId, ContactPatch, CoreError, FieldName};
pub use crate::store::{ContactStore, DeleteOutcome, Document, ImportReport, StoreError};

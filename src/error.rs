use thiserror::Error;

use crate::config::ConfigError;
use crate::core::CoreError;
use crate::edit::EditError;
use crate::store::StoreError;

/// What we know about side effects when an error is returned.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Effect {
    /// Definitely no side effects occurred.
    None,
    /// We don't know if side effects occurred (a write failed part way).
    Unknown,
}

impl Effect {
    pub fn as_str(self) -> &'static str {
        match self {
            Effect::None => "none",
            Effect::Unknown => "unknown",
        }
    }
}

/// Crate-level convenience error.
///
/// Thin wrapper over the capability errors; each variant keeps its own
/// message so the binary can print `{err}` without extra context.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read confirmation: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl Error {
    pub fn effect(&self) -> Effect {
        match self {
            Error::Core(_) => Effect::None,
            Error::Store(e) => e.effect(),
            Error::Edit(_) => Effect::None,
            Error::Config(_) => Effect::None,
            Error::Prompt(_) | Error::Output(_) => Effect::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn validation_errors_have_no_effect() {
        let err: Error = CoreError::IndexOutOfRange { index: 4, len: 2 }.into();
        assert_eq!(err.effect(), Effect::None);
        assert_eq!(err.to_string(), "contact index 4 out of range (0..2)");
    }

    #[test]
    fn write_failures_have_unknown_effect() {
        let err: Error = StoreError::Write {
            path: PathBuf::from("/tmp/contacts.json"),
            source: std::io::Error::other("disk full"),
        }
        .into();
        assert_eq!(err.effect(), Effect::Unknown);
        assert_eq!(err.effect().as_str(), "unknown");
    }
}

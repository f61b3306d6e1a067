use std::path::PathBuf;

use thiserror::Error;

use crate::error::Effect;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to snapshot {} to {}: {source}", from.display(), to.display())]
    Snapshot {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed contact data in {}: {reason}", path.display())]
    MalformedData { path: PathBuf, reason: String },

    #[error("failed to serialize contacts: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub fn effect(&self) -> Effect {
        match self {
            StoreError::Write { .. } => Effect::Unknown,
            StoreError::Read { .. }
            | StoreError::Snapshot { .. }
            | StoreError::MalformedData { .. }
            | StoreError::Serialize(_) => Effect::None,
        }
    }
}

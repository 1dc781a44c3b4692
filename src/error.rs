use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = HuffmanError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A guarantee the codec makes about its own tables did not hold.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("artifact at {} could not be used", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    #[error("corrupt data: {0}")]
    CorruptData(String),
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("unexpected magic bytes {0:?}")]
    BadMagic([u8; 4]),

    #[error("unsupported artifact version {0}")]
    UnsupportedVersion(u8),

    #[error("malformed artifact: {0}")]
    Malformed(String),
}

impl HuffmanError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: impl Into<ArtifactError>) -> Self {
        HuffmanError::Storage {
            path: path.into(),
            source: source.into(),
        }
    }
}

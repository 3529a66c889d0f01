use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read task file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed task file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to walk task root: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("unknown filter field `{0}`")]
    UnknownFilterField(String),

    #[error("no task source configured")]
    NoTaskSource,
}

pub type Result<T> = std::result::Result<T, RosterError>;

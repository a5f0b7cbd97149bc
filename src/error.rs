//! Errors raised at the edges of the compiler: configuration, playlist
//! documents and playlist stores. Compilation itself never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid playlist document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("unknown media type: {0}")]
    UnknownMediaType(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

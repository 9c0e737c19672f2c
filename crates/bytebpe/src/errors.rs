//! # Errors

use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by training, persistence, and decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration cannot produce a valid vocabulary.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The training corpus yielded no symbols.
    #[error("no training data: {0}")]
    NoData(String),

    /// A saved vocabulary / merge table pair is internally inconsistent.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// A token id outside the vocabulary was requested.
    #[error("token id {token} is outside the vocabulary")]
    Decode {
        /// The offending token id.
        token: u64,
    },

    /// IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation or matching failure.
    #[error("regex error: {0}")]
    Regex(#[from] Box<fancy_regex::Error>),
}

impl From<fancy_regex::Error> for Error {
    fn from(err: fancy_regex::Error) -> Self {
        Error::Regex(Box::new(err))
    }
}

pub(crate) fn corrupt<S: Into<String>>(msg: S) -> Error {
    let msg = msg.into();
    log::warn!("rejecting artifact: {msg}");
    Error::CorruptArtifact(msg)
}

pub(crate) fn config<S: Into<String>>(msg: S) -> Error {
    Error::Config(msg.into())
}

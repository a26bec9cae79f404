use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GauthError>;

#[derive(Debug, Error)]
pub enum GauthError {
    #[error("invalid key: {0}")]
    InvalidSecret(String),

    #[error("{}:{line}: invalid key", .path.display())]
    MalformedRecord { path: PathBuf, line: usize },

    #[error("no such key {0:?}")]
    UnknownKey(String),

    #[error("invalid key counter at byte {offset} ({text:?})")]
    CorruptCounter { offset: usize, text: String },

    #[error("reading keychain {}: {source}", .path.display())]
    StoreRead { path: PathBuf, source: io::Error },

    #[error("updating keychain {}: {source}", .path.display())]
    StoreWrite { path: PathBuf, source: io::Error },

    #[error("invalid key name {0:?}: spaces aren't allowed")]
    InvalidName(String),

    #[error("unsupported digit count {0}, expected 6, 7 or 8")]
    InvalidDigits(u32),

    #[error("error reading key: {0}")]
    ReadInput(io::Error),

    #[error("reading config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("{0}")]
    Usage(String),
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid content in {}: {reason}", .path.display())]
    InvalidContent { path: PathBuf, reason: String },

    #[error("Duplicate path '{route}': defined by both {first} and {second}")]
    DuplicatePath {
        route: String,
        first: String,
        second: String,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    pub fn invalid_content(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidContent {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

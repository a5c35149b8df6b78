use std::path::PathBuf;
use thiserror::Error;

/// Errors raised around the pricing core: loading bookings, settings and
/// templates, and talking to the user.
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("service #{index} ({id}) has malformed fields: {source}")]
    InvalidService {
        index: usize,
        id: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid booking data: {0}")]
    InvalidBooking(#[from] toml::de::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("failed to serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

impl ContractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;

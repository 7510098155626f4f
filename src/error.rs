use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the game before or outside the frame loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown argument `{0}` (try --help)")]
    UnknownArgument(String),

    #[error("missing value for `{0}`")]
    MissingValue(&'static str),

    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: &'static str, value: String },

    #[error("cannot read tuning file {}: {source}", path.display())]
    TuningRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse tuning file {}: {source}", path.display())]
    TuningParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

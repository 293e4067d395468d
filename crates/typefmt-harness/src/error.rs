//! Harness errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: Box<HarnessError>,
    },
    #[error("unknown argument kind '{0}'")]
    UnknownArgKind(String),
    #[error("argument of kind '{kind}' has invalid value {value}")]
    BadArgValue { kind: String, value: String },
    #[error("expected KIND:VALUE, got '{0}'")]
    MalformedCliArg(String),
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(PathBuf),
}

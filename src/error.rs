use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems found while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color for `{key}`: {value:?} (expected #RRGGBB)")]
    InvalidColor { key: String, value: String },
    #[error("unknown palette entry `{0}`")]
    UnknownPaletteEntry(String),
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

/// Top-level error for the host binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

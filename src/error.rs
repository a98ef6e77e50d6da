// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Why a session could not be opened.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to open X display '{display}'. Check the DISPLAY environment variable or X server status.")]
    Connection { display: String },
    #[error("XCreateSimpleWindow failed")]
    WindowCreation,
    #[error("Window title contains an interior NUL byte")]
    InvalidTitle,
}

/// Failure to load `x11lite.json`. Never fatal: callers fall back to defaults.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TexpandError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Keyboard controller error: {0}")]
    Enigo(String),

    #[error("Keyboard hook error: {0}")]
    Keyboard(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Daemon already running with PID {0}")]
    DaemonAlreadyRunning(u32),

    #[error("Daemon is not running")]
    DaemonNotRunning,

    #[error("Invalid PID in daemon file")]
    InvalidPid,

    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TexpandError>;

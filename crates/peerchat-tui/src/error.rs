//! Terminal client errors.

use std::io;

use peerchat_app::RoomError;
use thiserror::Error;

/// Errors that end the terminal client.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations or the log file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The initial room could not be joined.
    #[error("room error: {0}")]
    Room(#[from] RoomError),

    /// The logging subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// The session task failed.
    #[error("session task failed: {0}")]
    Session(#[from] tokio::task::JoinError),
}

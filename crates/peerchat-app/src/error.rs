//! Error types.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures reported by a [`crate::Room`] or [`crate::Host`].
///
/// None of these are fatal to the session; the executor turns each one into a
/// user-visible notice.
#[derive(Debug, Error)]
pub enum RoomError {
    /// Room name rejected before any network work.
    #[error("invalid room name '{0}'")]
    InvalidRoomName(String),

    /// Joining the room failed.
    #[error("could not join '{room}': {reason}")]
    Join {
        /// Requested room name.
        room: String,
        /// Underlying cause.
        reason: String,
    },

    /// The file to send could not be read.
    #[error("could not read '{}': {source}", .path.display())]
    SendFile {
        /// Path given to `/send`.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The path to send exists but is not a regular file.
    #[error("'{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),

    /// The room was already left.
    #[error("room closed")]
    Closed,
}

/// The dispatcher is gone and no longer accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session closed")]
pub struct SessionClosed;

//! The live binding of a user identity to a room.

use std::sync::Arc;

use crate::Room;

/// A username bound to exactly one current room.
///
/// Only the dispatch loop mutates a session; command tasks hand their results
/// back as [`crate::CommandOutcome`]s instead of touching it.
#[derive(Debug)]
pub struct Session<R> {
    username: String,
    room: Arc<R>,
}

impl<R: Room> Session<R> {
    /// Bind `username` to `room`.
    pub fn new(username: impl Into<String>, room: Arc<R>) -> Self {
        Self { username: username.into(), room }
    }

    /// Current display name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Current room handle.
    pub fn room(&self) -> &Arc<R> {
        &self.room
    }

    /// Current room name.
    pub fn room_name(&self) -> &str {
        self.room.name()
    }

    pub(crate) fn rename(&mut self, username: String) {
        self.username = username;
    }

    /// Swap in a new room, returning the previous one.
    pub(crate) fn replace_room(&mut self, room: Arc<R>) -> Arc<R> {
        std::mem::replace(&mut self.room, room)
    }

    /// Leave the current room, ending the session.
    pub async fn close(self) {
        tracing::debug!(room = %self.room.name(), "leaving room on session close");
        self.room.leave().await;
    }
}

//! Dispatcher input events.
//!
//! [`ChatEvent`] has one variant per concurrent source the dispatcher reads.
//! Results handed back by command tasks travel separately as
//! [`crate::CommandOutcome`].

use std::fmt;

use crate::{Command, LogNotice};

/// Opaque peer identifier as reported by a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(String);

impl PeerId {
    /// Wrap a peer identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Full identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat message received from another peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMessage {
    /// Display name of the sender.
    pub sender: String,
    /// Message text.
    pub text: String,
}

impl PeerMessage {
    /// Create a peer message.
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self { sender: sender.into(), text: text.into() }
    }
}

/// Events consumed by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Chat text typed by the local user.
    SelfMessage(String),

    /// A parsed slash command.
    Command(Command),

    /// Message from the current (or draining) room.
    PeerMessage(PeerMessage),

    /// Notice from a room or a command task.
    LogNotice(LogNotice),

    /// Periodic peer-list refresh.
    Tick,
}

//! Display surface contract.
//!
//! The dispatcher renders structured [`Line`]s; colours, layout and peer id
//! formatting are the surface's business.

use crate::{LogNotice, PeerId, PeerMessage};

/// Who a rendered line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Typed by the local user.
    SelfMessage,
    /// Sent by another peer.
    Peer,
    /// A log notice.
    Notice,
}

/// One rendered history line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line origin.
    pub kind: LineKind,
    /// Username or notice category shown before the text.
    pub tag: String,
    /// Line body.
    pub text: String,
}

impl Line {
    /// Own chat message tagged with the local username.
    pub fn own(username: &str, text: impl Into<String>) -> Self {
        Self { kind: LineKind::SelfMessage, tag: username.to_owned(), text: text.into() }
    }

    /// Peer chat message tagged with its sender.
    pub fn peer(message: PeerMessage) -> Self {
        Self { kind: LineKind::Peer, tag: message.sender, text: message.text }
    }

    /// Notice tagged with its category.
    pub fn notice(notice: LogNotice) -> Self {
        Self { kind: LineKind::Notice, tag: notice.category, text: notice.text }
    }
}

/// Rendering target driven by the dispatcher.
///
/// Only the dispatch loop calls these methods, so implementations need no
/// internal synchronization beyond what their own rendering requires.
pub trait Surface: Send + 'static {
    /// Append a line to the history.
    fn append(&mut self, line: Line);

    /// Clear all rendered history.
    fn clear_history(&mut self);

    /// Set the history title.
    fn set_title(&mut self, title: &str);

    /// Set the label shown before the input field.
    fn set_input_label(&mut self, label: &str);

    /// Replace the peer list.
    fn set_peers(&mut self, peers: Vec<PeerId>);

    /// Request an explicit redraw.
    fn redraw(&mut self);
}

/// Input label for a username.
pub fn input_label(username: &str) -> String {
    format!("{username} > ")
}

/// History title after moving into `room`.
pub fn migrated_title(room: &str) -> String {
    format!("ChatRoom-{room}")
}

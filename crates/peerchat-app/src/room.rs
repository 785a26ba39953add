//! Room and host contracts.
//!
//! The session never implements transport itself. A [`Host`] joins rooms on
//! behalf of one network identity; each join hands back a [`Joined`] bundle
//! holding the [`Room`] handle plus the receiving ends of its inbound message
//! and notice sources. The dispatcher owns those receivers, which is what lets
//! it close and drain them when the session moves to another room.

use std::{future::Future, path::Path, sync::Arc};

use tokio::sync::mpsc;

use crate::{LogNotice, PeerId, PeerMessage, RoomError};

/// One joined chat room.
///
/// # Invariants
///
/// - After [`Room::leave`] the room stops sending on the receivers handed out
///   in its [`Joined`] bundle.
/// - [`Room::leave`] may be called more than once; calls after the first are
///   no-ops.
pub trait Room: Send + Sync + 'static {
    /// Room name.
    fn name(&self) -> &str;

    /// Broadcast a chat message to the room (outbound sink).
    ///
    /// # Errors
    ///
    /// Returns an error if the room has been left or the transport refused the
    /// message.
    fn publish(&self, text: String) -> impl Future<Output = Result<(), RoomError>> + Send;

    /// Current peers in the room, in no particular order.
    fn peers(&self) -> Vec<PeerId>;

    /// Rebind the display name used for outbound messages.
    fn update_username(&self, username: &str);

    /// Share a file with the room.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or sent.
    fn send_file(&self, path: &Path) -> impl Future<Output = Result<(), RoomError>> + Send;

    /// Leave the room and release its subscriptions.
    fn leave(&self) -> impl Future<Output = ()> + Send;
}

/// A network identity able to join rooms.
///
/// Cloned into every command task; clones share the same identity.
pub trait Host: Clone + Send + Sync + 'static {
    /// Room handle type produced by [`Host::join`].
    type Room: Room;

    /// Join `room_name` as `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the room cannot be joined.
    /// A failed join has no side effects.
    fn join(
        &self,
        username: &str,
        room_name: &str,
    ) -> impl Future<Output = Result<Joined<Self::Room>, RoomError>> + Send;
}

/// A freshly joined room and the receiving ends of its event sources.
#[derive(Debug)]
pub struct Joined<R> {
    /// Room handle.
    pub room: Arc<R>,
    /// Chat messages from other peers.
    pub inbound: mpsc::Receiver<PeerMessage>,
    /// Room-originated notices.
    pub notices: mpsc::Receiver<LogNotice>,
}

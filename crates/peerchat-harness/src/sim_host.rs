//! In-process simulated host.
//!
//! Rooms live in a shared table keyed by name. Every member joined through the
//! same [`SimHost`] (or added as a [`SimPeer`]) sees the others' messages; no
//! member receives its own. Deliveries go through bounded channels exactly as
//! a networked room would feed the dispatcher.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use peerchat_app::{Host, Joined, LogNotice, PeerId, PeerMessage, Room, RoomError};
use tokio::sync::{Semaphore, mpsc};
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;
const PEER_ID_PREFIX: &str = "12D3KooWSim";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sending halves feeding one joined session.
#[derive(Debug, Clone)]
struct Outlet {
    inbound: mpsc::Sender<PeerMessage>,
    notices: mpsc::Sender<LogNotice>,
}

#[derive(Debug)]
struct Member {
    id: PeerId,
    /// `None` for simulated peers, which only send.
    outlet: Option<Outlet>,
}

#[derive(Debug, Default)]
struct HostState {
    rooms: HashMap<String, Vec<Member>>,
    failing: HashMap<String, String>,
    gates: HashMap<String, Arc<Semaphore>>,
    waiting_joins: usize,
    joins: Vec<String>,
    next_peer: u64,
}

impl HostState {
    fn allocate_peer_id(&mut self) -> PeerId {
        self.next_peer = self.next_peer.wrapping_add(1);
        PeerId::new(format!("{PEER_ID_PREFIX}{:016x}", self.next_peer))
    }
}

enum Delivery {
    Message(PeerMessage),
    Notice(LogNotice),
}

/// Shared in-process network.
///
/// Clones share the same room table.
#[derive(Debug, Clone, Default)]
pub struct SimHost {
    state: Arc<Mutex<HostState>>,
}

impl SimHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future join of `room` fail with `reason`.
    pub fn fail_joins(&self, room: impl Into<String>, reason: impl Into<String>) {
        lock(&self.state).failing.insert(room.into(), reason.into());
    }

    /// Hold every future join of `room` until the returned gate is opened.
    pub fn hold_joins(&self, room: impl Into<String>) -> JoinGate {
        let permits = Arc::new(Semaphore::new(0));
        lock(&self.state).gates.insert(room.into(), Arc::clone(&permits));
        JoinGate { permits }
    }

    /// Joins currently blocked on a [`JoinGate`].
    pub fn waiting_joins(&self) -> usize {
        lock(&self.state).waiting_joins
    }

    /// Room names passed to [`Host::join`], in call order.
    pub fn joins(&self) -> Vec<String> {
        lock(&self.state).joins.clone()
    }

    /// Number of members (sessions and simulated peers) in `room`.
    pub fn member_count(&self, room: &str) -> usize {
        lock(&self.state).rooms.get(room).map_or(0, Vec::len)
    }

    /// Add a simulated remote peer to `room`, creating the room if needed.
    pub fn add_peer(&self, room: impl Into<String>, username: impl Into<String>) -> SimPeer {
        let room = room.into();
        let mut state = lock(&self.state);
        let id = state.allocate_peer_id();
        state.rooms.entry(room.clone()).or_default().push(Member { id: id.clone(), outlet: None });

        SimPeer { host: self.clone(), room, id, username: username.into() }
    }

    fn peers(&self, room: &str) -> Vec<PeerId> {
        lock(&self.state)
            .rooms
            .get(room)
            .map(|members| members.iter().map(|m| m.id.clone()).collect())
            .unwrap_or_default()
    }

    fn remove(&self, room: &str, id: &PeerId) {
        let mut state = lock(&self.state);
        if let Some(members) = state.rooms.get_mut(room) {
            members.retain(|m| &m.id != id);
            if members.is_empty() {
                state.rooms.remove(room);
            }
        }
    }

    /// Deliver to every member of `room` except `from`.
    async fn broadcast(&self, room: &str, from: &PeerId, delivery: Delivery) {
        let outlets: Vec<Outlet> = lock(&self.state)
            .rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter(|m| &m.id != from)
                    .filter_map(|m| m.outlet.clone())
                    .collect()
            })
            .unwrap_or_default();

        for outlet in outlets {
            let delivered = match &delivery {
                Delivery::Message(message) => outlet.inbound.send(message.clone()).await.is_ok(),
                Delivery::Notice(notice) => outlet.notices.send(notice.clone()).await.is_ok(),
            };
            if !delivered {
                debug!(room, "member stopped receiving, delivery dropped");
            }
        }
    }
}

fn validate_room_name(name: &str) -> Result<(), RoomError> {
    let valid = !name.trim().is_empty() && !name.chars().any(|c| c == '/' || c.is_control());
    if valid { Ok(()) } else { Err(RoomError::InvalidRoomName(name.to_owned())) }
}

impl Host for SimHost {
    type Room = SimRoom;

    async fn join(&self, username: &str, room_name: &str) -> Result<Joined<SimRoom>, RoomError> {
        let gate = {
            let mut state = lock(&self.state);
            state.joins.push(room_name.to_owned());
            let gate = state.gates.get(room_name).cloned();
            if gate.is_some() {
                state.waiting_joins += 1;
            }
            gate
        };

        if let Some(gate) = gate {
            let permit = gate.acquire().await;
            lock(&self.state).waiting_joins -= 1;
            if permit.is_err() {
                return Err(RoomError::Join {
                    room: room_name.to_owned(),
                    reason: "join abandoned".to_owned(),
                });
            }
        }

        let peer_id = {
            let mut state = lock(&self.state);
            validate_room_name(room_name)?;
            if let Some(reason) = state.failing.get(room_name) {
                return Err(RoomError::Join { room: room_name.to_owned(), reason: reason.clone() });
            }

            state.allocate_peer_id()
        };

        let (inbound_tx, inbound) = mpsc::channel(CHANNEL_CAPACITY);
        let (notices_tx, notices) = mpsc::channel(CHANNEL_CAPACITY);
        lock(&self.state).rooms.entry(room_name.to_owned()).or_default().push(Member {
            id: peer_id.clone(),
            outlet: Some(Outlet { inbound: inbound_tx, notices: notices_tx }),
        });

        debug!(room = room_name, user = username, peer = %peer_id, "joined simulated room");

        let room = SimRoom {
            name: room_name.to_owned(),
            peer_id,
            host: self.clone(),
            username: Mutex::new(username.to_owned()),
            left: AtomicBool::new(false),
            leave_calls: AtomicUsize::new(0),
            published: Mutex::new(Vec::new()),
            renames: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
        };

        Ok(Joined { room: Arc::new(room), inbound, notices })
    }
}

/// Holds joins of one room until opened.
#[derive(Debug, Clone)]
pub struct JoinGate {
    permits: Arc<Semaphore>,
}

impl JoinGate {
    /// Let held joins through, one at a time, and every later one after them.
    pub fn open(&self) {
        self.permits.add_permits(1);
    }
}

/// One session's membership in a simulated room.
///
/// Records everything done through it so tests can assert on it.
#[derive(Debug)]
pub struct SimRoom {
    name: String,
    peer_id: PeerId,
    host: SimHost,
    username: Mutex<String>,
    left: AtomicBool,
    leave_calls: AtomicUsize,
    published: Mutex<Vec<String>>,
    renames: Mutex<Vec<String>>,
    files: Mutex<Vec<PathBuf>>,
}

impl SimRoom {
    /// This membership's peer id.
    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    /// Display name used for outbound messages.
    pub fn username(&self) -> String {
        lock(&self.username).clone()
    }

    /// Every message published through this room.
    pub fn published(&self) -> Vec<String> {
        lock(&self.published).clone()
    }

    /// Every username update, in order.
    pub fn renames(&self) -> Vec<String> {
        lock(&self.renames).clone()
    }

    /// Every file successfully sent.
    pub fn files_sent(&self) -> Vec<PathBuf> {
        lock(&self.files).clone()
    }

    /// Number of [`Room::leave`] calls, including repeated ones.
    pub fn leave_calls(&self) -> usize {
        self.leave_calls.load(Ordering::SeqCst)
    }

    /// Whether the room has been left.
    pub fn has_left(&self) -> bool {
        self.left.load(Ordering::SeqCst)
    }
}

impl Room for SimRoom {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, text: String) -> Result<(), RoomError> {
        if self.has_left() {
            return Err(RoomError::Closed);
        }

        lock(&self.published).push(text.clone());
        let message = PeerMessage::new(self.username(), text);
        self.host.broadcast(&self.name, &self.peer_id, Delivery::Message(message)).await;
        Ok(())
    }

    fn peers(&self) -> Vec<PeerId> {
        let mut peers = self.host.peers(&self.name);
        peers.retain(|id| id != &self.peer_id);
        peers
    }

    fn update_username(&self, username: &str) {
        *lock(&self.username) = username.to_owned();
        lock(&self.renames).push(username.to_owned());
    }

    async fn send_file(&self, path: &Path) -> Result<(), RoomError> {
        if self.has_left() {
            return Err(RoomError::Closed);
        }

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| RoomError::SendFile { path: path.to_path_buf(), source })?;
        if !metadata.is_file() {
            return Err(RoomError::NotAFile(path.to_path_buf()));
        }

        lock(&self.files).push(path.to_path_buf());

        let file_name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        let notice = LogNotice::new(
            "file",
            format!("{} shared {file_name} ({} bytes)", self.username(), metadata.len()),
        );
        self.host.broadcast(&self.name, &self.peer_id, Delivery::Notice(notice)).await;
        Ok(())
    }

    async fn leave(&self) {
        self.leave_calls.fetch_add(1, Ordering::SeqCst);
        if self.left.swap(true, Ordering::SeqCst) {
            debug!(room = %self.name, "room already left");
            return;
        }

        self.host.remove(&self.name, &self.peer_id);
        debug!(room = %self.name, peer = %self.peer_id, "left simulated room");
    }
}

/// A simulated remote peer.
#[derive(Debug, Clone)]
pub struct SimPeer {
    host: SimHost,
    room: String,
    id: PeerId,
    username: String,
}

impl SimPeer {
    /// Peer id shown in snapshots.
    pub fn id(&self) -> &PeerId {
        &self.id
    }

    /// Display name attached to messages.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Room the peer is in.
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Send a chat message to every session in the room.
    pub async fn say(&self, text: impl Into<String>) {
        let message = PeerMessage::new(self.username.clone(), text);
        self.host.broadcast(&self.room, &self.id, Delivery::Message(message)).await;
    }

    /// Send a notice to every session in the room.
    pub async fn announce(&self, notice: LogNotice) {
        self.host.broadcast(&self.room, &self.id, Delivery::Notice(notice)).await;
    }

    /// Remove the peer from the room.
    pub fn leave(&self) {
        self.host.remove(&self.room, &self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn members_receive_each_others_messages() {
        let host = SimHost::new();
        let mut alice = host.join("alice", "lobby").await.unwrap();
        let mut bob = host.join("bob", "lobby").await.unwrap();

        alice.room.publish("hi bob".into()).await.unwrap();

        assert_eq!(bob.inbound.recv().await, Some(PeerMessage::new("alice", "hi bob")));
        assert!(alice.inbound.try_recv().is_err(), "sender must not receive its own message");
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let host = SimHost::new();
        let lobby = host.join("alice", "lobby").await.unwrap();
        let mut general = host.join("bob", "general").await.unwrap();

        lobby.room.publish("hello".into()).await.unwrap();

        assert!(general.inbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn scripted_join_failure_has_no_effect() {
        let host = SimHost::new();
        host.fail_joins("ghost", "no such topic");

        let err = host.join("alice", "ghost").await.unwrap_err();

        assert!(matches!(err, RoomError::Join { ref room, .. } if room == "ghost"));
        assert_eq!(host.member_count("ghost"), 0);
        assert_eq!(host.joins(), vec!["ghost".to_string()]);
    }

    #[tokio::test]
    async fn held_join_waits_for_gate() {
        let host = SimHost::new();
        let gate = host.hold_joins("general");

        let pending = tokio::spawn({
            let host = host.clone();
            async move { host.join("alice", "general").await.map(|j| j.room.name().to_owned()) }
        });
        while host.waiting_joins() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(host.member_count("general"), 0);

        gate.open();

        assert_eq!(pending.await.unwrap().unwrap(), "general");
        assert_eq!(host.waiting_joins(), 0);
    }

    #[tokio::test]
    async fn invalid_names_are_rejected() {
        let host = SimHost::new();

        for name in ["", "  ", "a/b", "tab\tname"] {
            let err = host.join("alice", name).await.unwrap_err();
            assert!(matches!(err, RoomError::InvalidRoomName(_)), "{name:?} accepted");
        }
    }

    #[tokio::test]
    async fn peers_exclude_self() {
        let host = SimHost::new();
        let alice = host.join("alice", "lobby").await.unwrap();
        let bob = host.add_peer("lobby", "bob");

        assert_eq!(alice.room.peers(), vec![bob.id().clone()]);
    }

    #[tokio::test]
    async fn leave_is_idempotent_and_closes_inbound() {
        let host = SimHost::new();
        let mut alice = host.join("alice", "lobby").await.unwrap();

        alice.room.leave().await;
        alice.room.leave().await;

        assert_eq!(alice.room.leave_calls(), 2);
        assert!(alice.room.has_left());
        assert_eq!(host.member_count("lobby"), 0);
        assert_eq!(alice.inbound.recv().await, None);
        assert!(matches!(alice.room.publish("late".into()).await, Err(RoomError::Closed)));
    }

    #[tokio::test]
    async fn rename_changes_sender_name() {
        let host = SimHost::new();
        let alice = host.join("alice", "lobby").await.unwrap();
        let mut bob = host.join("bob", "lobby").await.unwrap();

        alice.room.update_username("alicia");
        alice.room.publish("new name".into()).await.unwrap();

        assert_eq!(bob.inbound.recv().await.map(|m| m.sender), Some("alicia".to_string()));
        assert_eq!(alice.room.renames(), vec!["alicia".to_string()]);
    }

    #[tokio::test]
    async fn shared_file_is_announced() {
        let host = SimHost::new();
        let alice = host.join("alice", "lobby").await.unwrap();
        let mut bob = host.join("bob", "lobby").await.unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"twelve bytes").unwrap();

        alice.room.send_file(file.path()).await.unwrap();

        let notice = bob.notices.recv().await.unwrap();
        assert_eq!(notice.category, "file");
        assert!(notice.text.contains("12 bytes"), "{}", notice.text);
        assert_eq!(alice.room.files_sent(), vec![file.path().to_path_buf()]);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let host = SimHost::new();
        let alice = host.join("alice", "lobby").await.unwrap();
        let dir = tempfile::tempdir().unwrap();

        let missing = alice.room.send_file(&dir.path().join("nope.txt")).await;
        let directory = alice.room.send_file(dir.path()).await;

        assert!(matches!(missing, Err(RoomError::SendFile { .. })));
        assert!(matches!(directory, Err(RoomError::NotAFile(_))));
        assert!(alice.room.files_sent().is_empty());
    }

    #[tokio::test]
    async fn simulated_peer_talks_to_sessions() {
        let host = SimHost::new();
        let mut alice = host.join("alice", "lobby").await.unwrap();
        let bob = host.add_peer("lobby", "bob");

        bob.say("hey").await;
        bob.announce(LogNotice::info("bob is typing")).await;

        assert_eq!(alice.inbound.recv().await, Some(PeerMessage::new("bob", "hey")));
        assert_eq!(alice.notices.recv().await.map(|n| n.text), Some("bob is typing".to_string()));

        bob.leave();
        assert!(alice.room.peers().is_empty());
    }
}

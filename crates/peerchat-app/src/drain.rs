//! Rooms being released after a migration.
//!
//! When the session swaps rooms, the previous room's receivers are closed but
//! kept. Closing stops new sends while everything already buffered (or backed
//! by an outstanding permit) can still be received, so the dispatch loop keeps
//! reading until both receivers report closure. Only then is the room left.

use std::{collections::VecDeque, future::pending, sync::Arc};

use tokio::sync::mpsc;

use crate::{ChatEvent, LogNotice, PeerMessage, Room};

/// One step of draining the oldest released room.
#[derive(Debug)]
pub(crate) enum Drain<R> {
    /// An event that was in flight when the room was released.
    Event(ChatEvent),
    /// Both receivers are closed and empty; the room can be left.
    Finished(Arc<R>),
}

struct DrainingRoom<R> {
    room: Arc<R>,
    inbound: mpsc::Receiver<PeerMessage>,
    notices: mpsc::Receiver<LogNotice>,
}

impl<R: Room> DrainingRoom<R> {
    /// Next in-flight event. `None` once both receivers are exhausted.
    async fn next(&mut self) -> Option<ChatEvent> {
        tokio::select! {
            Some(message) = self.inbound.recv() => Some(ChatEvent::PeerMessage(message)),
            Some(notice) = self.notices.recv() => Some(ChatEvent::LogNotice(notice)),
            else => None,
        }
    }
}

/// Released rooms, drained oldest first.
pub(crate) struct DrainQueue<R> {
    rooms: VecDeque<DrainingRoom<R>>,
}

impl<R: Room> DrainQueue<R> {
    pub(crate) fn new() -> Self {
        Self { rooms: VecDeque::new() }
    }

    /// Release a room: close its receivers and queue it for draining.
    pub(crate) fn push(
        &mut self,
        room: Arc<R>,
        mut inbound: mpsc::Receiver<PeerMessage>,
        mut notices: mpsc::Receiver<LogNotice>,
    ) {
        inbound.close();
        notices.close();
        self.rooms.push_back(DrainingRoom { room, inbound, notices });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Next drain step. Never resolves while the queue is empty.
    pub(crate) async fn next(&mut self) -> Drain<R> {
        let event = match self.rooms.front_mut() {
            Some(front) => front.next().await,
            None => pending().await,
        };

        match event {
            Some(event) => Drain::Event(event),
            None => match self.rooms.pop_front() {
                Some(done) => Drain::Finished(done.room),
                None => pending().await,
            },
        }
    }

    /// Abandon draining and hand back every queued room.
    pub(crate) fn take_all(&mut self) -> Vec<Arc<R>> {
        self.rooms.drain(..).map(|draining| draining.room).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, time::Duration};

    use super::*;
    use crate::{PeerId, RoomError};

    struct NamedRoom(&'static str);

    impl Room for NamedRoom {
        fn name(&self) -> &str {
            self.0
        }

        async fn publish(&self, _text: String) -> Result<(), RoomError> {
            Ok(())
        }

        fn peers(&self) -> Vec<PeerId> {
            Vec::new()
        }

        fn update_username(&self, _username: &str) {}

        async fn send_file(&self, _path: &Path) -> Result<(), RoomError> {
            Ok(())
        }

        async fn leave(&self) {}
    }

    #[tokio::test]
    async fn buffered_events_survive_release() {
        let (in_tx, in_rx) = mpsc::channel(8);
        let (notice_tx, notice_rx) = mpsc::channel(8);
        in_tx.send(PeerMessage::new("bob", "one")).await.unwrap();
        in_tx.send(PeerMessage::new("bob", "two")).await.unwrap();
        notice_tx.send(LogNotice::info("late notice")).await.unwrap();

        let mut queue = DrainQueue::new();
        queue.push(Arc::new(NamedRoom("lobby")), in_rx, notice_rx);

        // Released receivers refuse new sends
        assert!(in_tx.send(PeerMessage::new("bob", "three")).await.is_err());

        let mut texts = Vec::new();
        let finished = loop {
            match queue.next().await {
                Drain::Event(ChatEvent::PeerMessage(m)) => texts.push(m.text),
                Drain::Event(ChatEvent::LogNotice(n)) => texts.push(n.text),
                Drain::Event(other) => panic!("unexpected event {other:?}"),
                Drain::Finished(room) => break room,
            }
        };

        texts.sort();
        assert_eq!(texts, vec!["late notice", "one", "two"]);
        assert_eq!(finished.name(), "lobby");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn outstanding_permit_is_waited_for() {
        let (in_tx, in_rx) = mpsc::channel(8);
        let (_notice_tx, notice_rx) = mpsc::channel::<LogNotice>(8);
        let permit = in_tx.clone().reserve_owned().await.unwrap();

        let mut queue = DrainQueue::new();
        queue.push(Arc::new(NamedRoom("lobby")), in_rx, notice_rx);

        let late = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            permit.send(PeerMessage::new("bob", "in flight"));
        });

        let first = queue.next().await;
        assert!(matches!(
            first,
            Drain::Event(ChatEvent::PeerMessage(ref m)) if m.text == "in flight"
        ));
        assert!(matches!(queue.next().await, Drain::Finished(_)));
        late.await.unwrap();
    }

    #[tokio::test]
    async fn rooms_drain_in_release_order() {
        let mut queue = DrainQueue::new();
        for name in ["first", "second"] {
            let (_in_tx, in_rx) = mpsc::channel::<PeerMessage>(1);
            let (_notice_tx, notice_rx) = mpsc::channel::<LogNotice>(1);
            queue.push(Arc::new(NamedRoom(name)), in_rx, notice_rx);
        }
        assert_eq!(queue.len(), 2);

        let Drain::Finished(first) = queue.next().await else { panic!("expected finished") };
        let Drain::Finished(second) = queue.next().await else { panic!("expected finished") };

        assert_eq!(first.name(), "first");
        assert_eq!(second.name(), "second");
    }

    #[test]
    fn take_all_empties_queue() {
        let mut queue = DrainQueue::new();
        let (_in_tx, in_rx) = mpsc::channel::<PeerMessage>(1);
        let (_notice_tx, notice_rx) = mpsc::channel::<LogNotice>(1);
        queue.push(Arc::new(NamedRoom("lobby")), in_rx, notice_rx);

        let rooms = queue.take_all();

        assert_eq!(rooms.len(), 1);
        assert!(queue.is_empty());
    }
}

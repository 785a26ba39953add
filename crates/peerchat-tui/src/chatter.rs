//! Simulated peers for simulation mode.
//!
//! A handful of peers join the starting room and post canned lines at random
//! intervals, so the client has traffic to show without a network.

use std::time::Duration;

use peerchat_harness::{SimHost, SimPeer};
use rand::{Rng, seq::IndexedRandom};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const NAMES: &[&str] = &["ada", "grace", "linus", "barbara", "ken", "radia"];

const LINES: &[&str] = &[
    "hello everyone",
    "anyone around?",
    "just joined, what did I miss",
    "try /r to hop to another room",
    "brb",
    "the weather here is great today",
    "has anyone tried /send yet?",
    "back",
];

/// Delay range between two simulated messages, in milliseconds.
const MIN_DELAY_MS: u64 = 3_000;
const MAX_DELAY_MS: u64 = 8_000;

/// Pick the next delay, speaker and line.
///
/// Kept synchronous so the thread-local rng never lives across an await.
fn next_message(peers: &[SimPeer]) -> Option<(Duration, &SimPeer, &'static str)> {
    let mut rng = rand::rng();
    let delay = Duration::from_millis(rng.random_range(MIN_DELAY_MS..=MAX_DELAY_MS));
    let peer = peers.choose(&mut rng)?;
    let line = *LINES.choose(&mut rng)?;
    Some((delay, peer, line))
}

/// Add `count` simulated peers to `room` and let them talk until `shutdown`.
///
/// Peers leave the room when the task ends.
pub fn spawn(
    host: &SimHost,
    room: &str,
    count: usize,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let peers: Vec<SimPeer> = NAMES
        .iter()
        .cycle()
        .take(count)
        .enumerate()
        .map(|(i, name)| {
            let username = if i < NAMES.len() {
                (*name).to_owned()
            } else {
                format!("{name}{}", i / NAMES.len())
            };
            host.add_peer(room, username)
        })
        .collect();

    tokio::spawn(async move {
        debug!(peers = peers.len(), "simulated chatter started");

        while let Some((delay, peer, line)) = next_message(&peers) {
            tokio::select! {
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(delay) => peer.say(line).await,
            }
        }

        for peer in &peers {
            peer.leave();
        }
        debug!("simulated chatter stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn peers_join_and_leave() {
        let host = SimHost::new();
        let shutdown = CancellationToken::new();

        let task = spawn(&host, "lobby", 8, shutdown.clone());
        assert_eq!(host.member_count("lobby"), 8);

        shutdown.cancel();
        task.await.unwrap();
        assert_eq!(host.member_count("lobby"), 0);
    }

    #[tokio::test]
    async fn no_peers_means_no_chatter() {
        let host = SimHost::new();

        let task = spawn(&host, "lobby", 0, CancellationToken::new());

        task.await.unwrap();
        assert_eq!(host.member_count("lobby"), 0);
    }
}

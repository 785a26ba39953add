//! Simulation harness for peerchat
//!
//! Deterministic, in-process implementations of the session's collaborators:
//!
//! - [`SimHost`] / [`SimRoom`]: rooms keyed by name, broadcasting between every
//!   member joined through the same host, with scriptable join failures and
//!   recorded publishes, renames, file sends and leaves.
//! - [`SimPeer`]: a simulated remote peer that can talk in a room.
//! - [`JoinGate`]: holds joins of a room open so tests can act mid-migration.
//! - [`RecordingSurface`]: a display surface that records every call.
//!
//! The terminal client runs on the same host in simulation mode, so tests and
//! interactive use exercise identical room behaviour.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod recording;
mod sim_host;

use std::time::Duration;

pub use recording::RecordingSurface;
pub use sim_host::{JoinGate, SimHost, SimPeer, SimRoom};

/// Poll `condition` until it holds or five seconds pass.
///
/// Returns whether the condition was met.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    const TIMEOUT: Duration = Duration::from_secs(5);
    const POLL: Duration = Duration::from_millis(5);

    tokio::time::timeout(TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(POLL).await;
        }
    })
    .await
    .is_ok()
}

//! Async runtime
//!
//! Wires a session together: the simulated host and its chatter, the
//! dispatcher on its own task, and the terminal loop on the caller's task.
//! Whichever side stops first cancels the shared shutdown token; the current
//! room is left once both have stopped.

use peerchat_app::{Dispatcher, Host, SessionConfig};
use peerchat_harness::SimHost;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{TerminalSurface, TerminalUi, TuiError, chatter};

/// What to join and how.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Initial display name.
    pub username: String,
    /// Room joined at startup.
    pub room: String,
    /// Simulated peers chatting in the starting room.
    pub simulated_peers: usize,
    /// Dispatcher tuning.
    pub session: SessionConfig,
}

/// Terminal client runtime in simulation mode.
pub struct Runtime {
    config: RuntimeConfig,
    host: SimHost,
}

impl Runtime {
    /// Create a runtime over a fresh simulated host.
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config, host: SimHost::new() }
    }

    /// Run until the user quits.
    pub async fn run(self) -> Result<(), TuiError> {
        let Self { config, host } = self;
        let shutdown = CancellationToken::new();

        let chatter =
            chatter::spawn(&host, &config.room, config.simulated_peers, shutdown.child_token());

        let ui = TerminalUi::new()?;
        let joined = host.join(&config.username, &config.room).await?;
        info!(room = %config.room, user = %config.username, "session starting");

        let (surface, surface_rx) = TerminalSurface::channel();
        let (dispatcher, sink) = Dispatcher::new(
            config.session,
            host.clone(),
            config.username,
            joined,
            surface,
            shutdown.clone(),
        );
        let session = tokio::spawn(dispatcher.run());

        let ui_result = ui.run(surface_rx, sink, shutdown.clone()).await;
        shutdown.cancel();

        let session = session.await?;
        info!(room = %session.room_name(), "session ended");
        session.close().await;
        chatter.await?;

        ui_result
    }
}

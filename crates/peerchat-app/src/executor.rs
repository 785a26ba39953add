//! Command execution.
//!
//! Each command runs as its own task so a slow join or file transfer never
//! stalls the dispatch loop. Tasks never touch the [`crate::Session`]: they
//! report back through [`CommandOutcome`]s which the loop applies in order
//! with every other event.

use std::{path::Path, sync::Arc};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{Command, Host, Joined, LogNotice, Room, Verb};

/// Result of a command, applied by the dispatch loop.
#[derive(Debug)]
pub enum CommandOutcome<R> {
    /// Render a notice.
    Notice(LogNotice),

    /// Adopt a new display name.
    Renamed(String),

    /// Make a freshly joined room current.
    Joined {
        /// The joined room and its receivers.
        joined: Joined<R>,
        /// Username the room was joined with.
        username: String,
    },
}

/// What a command task sees of the session: a snapshot taken at dispatch.
pub struct CommandContext<H: Host> {
    host: H,
    room: Arc<H::Room>,
    username: String,
    outcomes: mpsc::UnboundedSender<CommandOutcome<H::Room>>,
    shutdown: CancellationToken,
}

impl<H: Host> CommandContext<H> {
    /// Snapshot the session for one command.
    pub fn new(
        host: H,
        room: Arc<H::Room>,
        username: impl Into<String>,
        outcomes: mpsc::UnboundedSender<CommandOutcome<H::Room>>,
        shutdown: CancellationToken,
    ) -> Self {
        Self { host, room, username: username.into(), outcomes, shutdown }
    }

    fn report(&self, outcome: CommandOutcome<H::Room>) {
        if self.outcomes.send(outcome).is_err() {
            debug!("session closed before command outcome was delivered");
        }
    }

    fn notify(&self, notice: LogNotice) {
        self.report(CommandOutcome::Notice(notice));
    }
}

/// Execute one command against a session snapshot.
///
/// Every failure becomes a notice; nothing here is fatal to the session.
pub async fn execute<H: Host>(command: Command, ctx: CommandContext<H>) {
    let Some(verb) = command.kind() else {
        debug!(verb = %command.verb, "unsupported command");
        ctx.notify(LogNotice::bad_command(format!("unsupported command - {}", command.verb)));
        return;
    };

    if verb.requires_argument() && command.argument.is_empty() {
        ctx.notify(LogNotice::bad_command(verb.missing_argument()));
        return;
    }

    match verb {
        Verb::Quit => {
            info!("quit requested");
            ctx.shutdown.cancel();
        },
        Verb::ChangeRoom => change_room(&ctx, command.argument).await,
        Verb::Rename => ctx.report(CommandOutcome::Renamed(command.argument)),
        Verb::SendFile => send_file(&ctx, Path::new(&command.argument)).await,
    }
}

/// Join `room_name` and hand the result back to the loop.
///
/// The swap itself happens in the loop; a failed join leaves the session
/// exactly as it was.
async fn change_room<H: Host>(ctx: &CommandContext<H>, room_name: String) {
    ctx.notify(LogNotice::room_change(format!("joining new room '{room_name}'")));

    match ctx.host.join(&ctx.username, &room_name).await {
        Ok(joined) => {
            info!(from = %ctx.room.name(), to = %room_name, "joined room");
            ctx.report(CommandOutcome::Joined { joined, username: ctx.username.clone() });
        },
        Err(e) => {
            warn!(room = %room_name, error = %e, "room join failed");
            ctx.notify(LogNotice::error(format!("could not change chat room - {e}")));
        },
    }
}

async fn send_file<H: Host>(ctx: &CommandContext<H>, path: &Path) {
    match ctx.room.send_file(path).await {
        Ok(()) => {
            info!(path = %path.display(), room = %ctx.room.name(), "file sent");
            ctx.notify(LogNotice::info("File sent successfully!"));
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "file send failed");
            ctx.notify(LogNotice::error(format!("Failed to send file: {e}")));
        },
    }
}

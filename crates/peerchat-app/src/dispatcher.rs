//! Session dispatch loop.
//!
//! The [`Dispatcher`] is the single point deciding what happens next. It
//! waits on every source at once (typed lines, commands, the current room's
//! messages and notices, command outcomes, rooms still draining, finished
//! command tasks, the peer tick and shutdown) and applies whichever is ready.
//! Selection among ready sources is randomised, so no source starves; each
//! source's own order is preserved.
//!
//! # Room migration
//!
//! A `/r` task only joins. The joined room comes back as a
//! [`CommandOutcome::Joined`] and is swapped in here, between two events,
//! so the loop never reads from a room it no longer considers current. The
//! previous room is closed for sending, drained, and then left. Only after
//! the last released room is left does the surface switch to the new room;
//! until then the new room's sources and typed lines stay buffered.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinSet, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    ChatEvent, Command, CommandContext, CommandOutcome, Host, InputSink, Joined, Line, LogNotice,
    PeerMessage, Room, Session, SessionConfig, Surface, Verb,
    drain::{Drain, DrainQueue},
    execute, input_label, migrated_title,
};

/// Serializes all session events onto one surface.
///
/// # Type Parameters
///
/// - `H`: network host used to join rooms
/// - `S`: display surface the session renders into
pub struct Dispatcher<H: Host, S: Surface> {
    config: SessionConfig,
    host: H,
    session: Session<H::Room>,
    inbound: mpsc::Receiver<PeerMessage>,
    notices: mpsc::Receiver<LogNotice>,
    draining: DrainQueue<H::Room>,
    lines: mpsc::Receiver<String>,
    commands: mpsc::Receiver<Command>,
    outcomes_tx: mpsc::UnboundedSender<CommandOutcome<H::Room>>,
    outcomes: mpsc::UnboundedReceiver<CommandOutcome<H::Room>>,
    tasks: JoinSet<()>,
    surface: S,
    shutdown: CancellationToken,
}

impl<H: Host, S: Surface> Dispatcher<H, S> {
    /// Create a dispatcher bound to an already joined room.
    ///
    /// Returns the dispatcher and the [`InputSink`] used to feed it typed
    /// lines. Cancelling `shutdown` ends [`Dispatcher::run`].
    pub fn new(
        config: SessionConfig,
        host: H,
        username: impl Into<String>,
        joined: Joined<H::Room>,
        surface: S,
        shutdown: CancellationToken,
    ) -> (Self, InputSink) {
        let capacity = config.effective_channel_capacity();
        let (line_tx, lines) = mpsc::channel(capacity);
        let (command_tx, commands) = mpsc::channel(capacity);
        let (outcomes_tx, outcomes) = mpsc::unbounded_channel();

        let Joined { room, inbound, notices } = joined;
        let dispatcher = Self {
            config,
            host,
            session: Session::new(username, room),
            inbound,
            notices,
            draining: DrainQueue::new(),
            lines,
            commands,
            outcomes_tx,
            outcomes,
            tasks: JoinSet::new(),
            surface,
            shutdown,
        };

        (dispatcher, InputSink::new(line_tx, command_tx))
    }

    /// Run until shutdown.
    ///
    /// Returns the session so the caller can leave its current room. Command
    /// tasks still running are aborted and rooms still draining are left
    /// before returning.
    pub async fn run(mut self) -> Session<H::Room> {
        self.surface.set_title(self.session.room_name());
        self.surface.set_input_label(&input_label(self.session.username()));
        self.surface.redraw();

        let mut ticker = tokio::time::interval(self.config.effective_tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(room = %self.session.room_name(), user = %self.session.username(), "session started");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,

                Some(text) = self.lines.recv(), if self.draining.is_empty() => {
                    self.apply(ChatEvent::SelfMessage(text)).await;
                }

                Some(command) = self.commands.recv() => {
                    self.apply(ChatEvent::Command(command)).await;
                }

                Some(message) = self.inbound.recv(), if self.draining.is_empty() => {
                    self.apply(ChatEvent::PeerMessage(message)).await;
                }

                Some(notice) = self.notices.recv(), if self.draining.is_empty() => {
                    self.apply(ChatEvent::LogNotice(notice)).await;
                }

                Some(outcome) = self.outcomes.recv() => self.apply_outcome(outcome),

                step = self.draining.next(), if !self.draining.is_empty() => match step {
                    Drain::Event(event) => self.apply(event).await,
                    Drain::Finished(room) => {
                        let remaining = self.draining.len();
                        debug!(room = %room.name(), remaining, "room drained");
                        room.leave().await;
                        if self.draining.is_empty() {
                            self.present_room();
                        }
                    },
                },

                Some(result) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = result
                        && e.is_panic()
                    {
                        warn!(error = %e, "command task panicked");
                        self.render_notice(LogNotice::error("command failed unexpectedly"));
                    }
                }

                _ = ticker.tick() => self.apply(ChatEvent::Tick).await,
            }
        }

        self.finish().await
    }

    /// Apply one event to the session and surface.
    async fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::SelfMessage(text) => {
                if let Err(e) = self.session.room().publish(text.clone()).await {
                    warn!(error = %e, "publish failed");
                    self.render_notice(LogNotice::error(format!("could not send message - {e}")));
                    return;
                }
                self.surface.append(Line::own(self.session.username(), text));
            },
            ChatEvent::Command(command) => self.dispatch_command(command),
            ChatEvent::PeerMessage(message) => self.surface.append(Line::peer(message)),
            ChatEvent::LogNotice(notice) => self.render_notice(notice),
            ChatEvent::Tick => {
                // Shutdown wins over a tick that raced with it
                if self.shutdown.is_cancelled() {
                    return;
                }
                self.surface.set_peers(self.session.room().peers());
                self.surface.redraw();
            },
        }
    }

    /// Hand a command to its own task.
    ///
    /// `/q` is applied here so a full task set can never keep the session
    /// alive.
    fn dispatch_command(&mut self, command: Command) {
        if command.kind() == Some(Verb::Quit) {
            info!("quit requested");
            self.shutdown.cancel();
            return;
        }

        if self.tasks.len() >= self.config.effective_max_inflight_commands() {
            let inflight = self.tasks.len();
            warn!(verb = %command.verb, inflight, "command rejected at capacity");
            self.render_notice(LogNotice::busy(format!(
                "too many commands in flight, dropped {}",
                command.verb
            )));
            return;
        }

        debug!(verb = %command.verb, "dispatching command");
        let ctx = CommandContext::new(
            self.host.clone(),
            Arc::clone(self.session.room()),
            self.session.username(),
            self.outcomes_tx.clone(),
            self.shutdown.clone(),
        );
        self.tasks.spawn(execute(command, ctx));
    }

    fn apply_outcome(&mut self, outcome: CommandOutcome<H::Room>) {
        match outcome {
            CommandOutcome::Notice(notice) => self.render_notice(notice),
            CommandOutcome::Renamed(username) => self.rename(username),
            CommandOutcome::Joined { joined, username } => self.swap_room(joined, &username),
        }
    }

    fn rename(&mut self, username: String) {
        info!(from = %self.session.username(), to = %username, "renamed");
        self.session.room().update_username(&username);
        self.session.rename(username);
        self.surface.set_input_label(&input_label(self.session.username()));
        self.surface.redraw();
    }

    /// Make `joined` the current room and release the previous one.
    ///
    /// The surface is switched over by [`Self::present_room`] once the
    /// released room has been drained and left.
    fn swap_room(&mut self, joined: Joined<H::Room>, joined_as: &str) {
        let Joined { room, inbound, notices } = joined;

        // A rename may have landed while the join was in flight
        if joined_as != self.session.username() {
            room.update_username(self.session.username());
        }

        let old_inbound = std::mem::replace(&mut self.inbound, inbound);
        let old_notices = std::mem::replace(&mut self.notices, notices);
        let old_room = self.session.replace_room(room);

        info!(from = %old_room.name(), to = %self.session.room_name(), "switched room");
        self.draining.push(old_room, old_inbound, old_notices);
    }

    /// Show the current room on a cleared surface.
    fn present_room(&mut self) {
        self.surface.clear_history();
        self.surface.set_title(&migrated_title(self.session.room_name()));
        self.surface.redraw();
    }

    fn render_notice(&mut self, notice: LogNotice) {
        self.surface.append(Line::notice(notice));
    }

    /// Stop command tasks and release every room except the current one.
    async fn finish(mut self) -> Session<H::Room> {
        debug!(inflight = self.tasks.len(), "session shutting down");
        self.tasks.shutdown().await;

        // Joins that completed but were never applied
        while let Ok(outcome) = self.outcomes.try_recv() {
            if let CommandOutcome::Joined { joined, .. } = outcome {
                joined.room.leave().await;
            }
        }

        for room in self.draining.take_all() {
            room.leave().await;
        }

        self.session
    }
}

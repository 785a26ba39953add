//! Surface handed to the dispatcher.
//!
//! The dispatcher runs on its own task, so its surface calls are forwarded
//! over an unbounded channel to the terminal loop, which owns the terminal.
//! Sends never block the dispatcher.

use peerchat_app::{Line, PeerId, Surface};
use tokio::sync::mpsc;
use tracing::trace;

/// One surface call, as seen by the terminal loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Append a history line.
    Append(Line),
    /// Clear the history.
    ClearHistory,
    /// Set the history title.
    SetTitle(String),
    /// Set the prompt label.
    SetInputLabel(String),
    /// Replace the peer list.
    SetPeers(Vec<PeerId>),
    /// Redraw now.
    Redraw,
}

/// [`Surface`] forwarding every call to the terminal loop.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    commands: mpsc::UnboundedSender<SurfaceCommand>,
}

impl TerminalSurface {
    /// Create a surface and the receiver the terminal loop reads from.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SurfaceCommand>) {
        let (commands, rx) = mpsc::unbounded_channel();
        (Self { commands }, rx)
    }

    fn forward(&self, command: SurfaceCommand) {
        if self.commands.send(command).is_err() {
            trace!("terminal closed, surface update dropped");
        }
    }
}

impl Surface for TerminalSurface {
    fn append(&mut self, line: Line) {
        self.forward(SurfaceCommand::Append(line));
    }

    fn clear_history(&mut self) {
        self.forward(SurfaceCommand::ClearHistory);
    }

    fn set_title(&mut self, title: &str) {
        self.forward(SurfaceCommand::SetTitle(title.to_owned()));
    }

    fn set_input_label(&mut self, label: &str) {
        self.forward(SurfaceCommand::SetInputLabel(label.to_owned()));
    }

    fn set_peers(&mut self, peers: Vec<PeerId>) {
        self.forward(SurfaceCommand::SetPeers(peers));
    }

    fn redraw(&mut self) {
        self.forward(SurfaceCommand::Redraw);
    }
}

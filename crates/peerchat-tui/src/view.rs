//! Display state rendered by [`crate::ui`].

use std::collections::VecDeque;

use peerchat_app::{Line, PeerId};

use crate::SurfaceCommand;

/// Lines kept in the history; older lines are dropped.
pub const MAX_HISTORY: usize = 1000;

/// What the terminal currently shows, built from [`SurfaceCommand`]s.
#[derive(Debug, Default)]
pub struct View {
    history: VecDeque<Line>,
    title: String,
    input_label: String,
    peers: Vec<PeerId>,
}

impl View {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one surface command.
    pub fn apply(&mut self, command: SurfaceCommand) {
        match command {
            SurfaceCommand::Append(line) => {
                if self.history.len() >= MAX_HISTORY {
                    self.history.pop_front();
                }
                self.history.push_back(line);
            },
            SurfaceCommand::ClearHistory => self.history.clear(),
            SurfaceCommand::SetTitle(title) => self.title = title,
            SurfaceCommand::SetInputLabel(label) => self.input_label = label,
            SurfaceCommand::SetPeers(peers) => self.peers = peers,
            SurfaceCommand::Redraw => {},
        }
    }

    /// History lines, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Line> {
        self.history.iter()
    }

    /// History title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Prompt label.
    pub fn input_label(&self) -> &str {
        &self.input_label
    }

    /// Peers in the current room.
    pub fn peers(&self) -> &[PeerId] {
        &self.peers
    }
}

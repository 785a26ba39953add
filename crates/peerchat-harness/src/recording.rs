//! Surface that records every call for later assertions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use peerchat_app::{Line, LineKind, PeerId, Surface};

#[derive(Debug, Default)]
struct Recorded {
    history: Vec<Line>,
    transcript: Vec<Line>,
    title: String,
    input_label: String,
    peers: Vec<PeerId>,
    peer_refreshes: usize,
    clears: usize,
    redraws: usize,
}

/// Recording [`Surface`].
///
/// Clones share the same record, so a test keeps one clone while the
/// dispatcher owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<Recorded>>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lines currently displayed (reset by [`Surface::clear_history`]).
    pub fn history(&self) -> Vec<Line> {
        self.lock().history.clone()
    }

    /// Every line ever appended, across clears.
    pub fn transcript(&self) -> Vec<Line> {
        self.lock().transcript.clone()
    }

    /// Transcript lines of one kind.
    pub fn lines_of(&self, kind: LineKind) -> Vec<Line> {
        self.lock().transcript.iter().filter(|line| line.kind == kind).cloned().collect()
    }

    /// Transcript notices with the given category.
    pub fn notices(&self, category: &str) -> Vec<String> {
        self.lock()
            .transcript
            .iter()
            .filter(|line| line.kind == LineKind::Notice && line.tag == category)
            .map(|line| line.text.clone())
            .collect()
    }

    /// Whether any transcript line has exactly this text.
    pub fn saw(&self, text: &str) -> bool {
        self.lock().transcript.iter().any(|line| line.text == text)
    }

    /// Current title.
    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    /// Current input label.
    pub fn input_label(&self) -> String {
        self.lock().input_label.clone()
    }

    /// Last peer list set.
    pub fn peers(&self) -> Vec<PeerId> {
        self.lock().peers.clone()
    }

    /// Number of peer list updates.
    pub fn peer_refreshes(&self) -> usize {
        self.lock().peer_refreshes
    }

    /// Number of history clears.
    pub fn clears(&self) -> usize {
        self.lock().clears
    }

    /// Number of explicit redraws.
    pub fn redraws(&self) -> usize {
        self.lock().redraws
    }
}

impl Surface for RecordingSurface {
    fn append(&mut self, line: Line) {
        let mut state = self.lock();
        state.history.push(line.clone());
        state.transcript.push(line);
    }

    fn clear_history(&mut self) {
        let mut state = self.lock();
        state.history.clear();
        state.clears += 1;
    }

    fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.lock().title);
    }

    fn set_input_label(&mut self, label: &str) {
        label.clone_into(&mut self.lock().input_label);
    }

    fn set_peers(&mut self, peers: Vec<PeerId>) {
        let mut state = self.lock();
        state.peers = peers;
        state.peer_refreshes += 1;
    }

    fn redraw(&mut self) {
        self.lock().redraws += 1;
    }
}

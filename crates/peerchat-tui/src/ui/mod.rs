//! UI rendering
//!
//! Rendering functions that turn the [`View`] and prompt state into terminal
//! output using ratatui widgets. All functions are pure (no I/O).

mod chat;
mod input;
mod peers;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

pub use peers::short_id;

use crate::{InputState, View};

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &View, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(MAIN_AREA_MIN_HEIGHT), Constraint::Length(INPUT_HEIGHT)])
        .split(frame.area());

    let [main_area, input_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, view, *main_area);
    input::render(frame, view.input_label(), input, *input_area);
}

/// Render the main area (chat history + peer list).
fn render_main_area(frame: &mut Frame, view: &View, area: Rect) {
    const PEER_SIDEBAR_WIDTH: u16 = 20;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(CHAT_AREA_MIN_WIDTH), Constraint::Length(PEER_SIDEBAR_WIDTH)])
        .split(area);

    let [chat_area, peers_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, view, *chat_area);
    peers::render(frame, view.peers(), *peers_area);
}

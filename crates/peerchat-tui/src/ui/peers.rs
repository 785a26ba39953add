//! Peer sidebar
//!
//! Lists the peers in the current room by the tail of their id.

use peerchat_app::PeerId;
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders, List, ListItem},
};

const PEER_ID_TAIL: usize = 8;

/// Last eight characters of a peer id.
pub fn short_id(id: &PeerId) -> &str {
    let id = id.as_str();
    let start = id.char_indices().rev().nth(PEER_ID_TAIL - 1).map_or(0, |(offset, _)| offset);
    &id[start..]
}

/// Render the peer list.
pub fn render(frame: &mut Frame, peers: &[PeerId], area: Rect) {
    let items: Vec<ListItem> = peers.iter().map(|id| ListItem::new(short_id(id))).collect();

    let block = Block::default().borders(Borders::ALL).title(" Peers ");
    frame.render_widget(List::new(items).block(block), area);
}

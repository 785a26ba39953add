//! Chat history
//!
//! Own messages are blue, peer messages green and notices yellow.

use peerchat_app::LineKind;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::View;

const BORDER_SIZE: u16 = 2;

fn tag_color(kind: LineKind) -> Color {
    match kind {
        LineKind::SelfMessage => Color::Blue,
        LineKind::Peer => Color::Green,
        LineKind::Notice => Color::Yellow,
    }
}

/// Render the chat history, newest lines at the bottom.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(" {} ", view.title()));

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = view.history().len().saturating_sub(visible_height);

    let items: Vec<ListItem> = view
        .history()
        .skip(skip)
        .map(|line| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("<{}>:", line.tag),
                    Style::default().fg(tag_color(line.kind)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(line.text.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

//! Input line
//!
//! Displays the prompt label and the input buffer with cursor.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::InputState;

const BORDER_OFFSET: u16 = 1; // inside left and top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, label: &str, input: &InputState, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let paragraph = Paragraph::new(format!("{label}{}", input.buffer()))
        .style(Style::default().fg(Color::White))
        .block(block);

    frame.render_widget(paragraph, area);

    let prompt_width = BORDER_OFFSET.saturating_add(label.chars().count() as u16);
    let cursor_x = area.x.saturating_add(prompt_width).saturating_add(input.cursor() as u16);
    let cursor_y = area.y.saturating_add(BORDER_OFFSET);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}

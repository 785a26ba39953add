//! Input state and key handling for the prompt.
//!
//! This module owns the text being typed (buffer, cursor) and handles
//! character-level key events. Submitted lines are handed to the session
//! as typed; classification happens in [`peerchat_app::parse`].

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// What a key press asks of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The buffer or cursor changed; redraw.
    Edited,
    /// A line was submitted. The buffer is now empty.
    Submit(String),
    /// The user asked to quit.
    Quit,
}

/// Text input buffer and cursor.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// correctly.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of the character at `index`, or the buffer length.
    fn byte_offset(&self, index: usize) -> usize {
        self.buffer.char_indices().nth(index).map_or(self.buffer.len(), |(offset, _)| offset)
    }

    /// Handle a key input event.
    pub fn handle_key(&mut self, key: KeyInput) -> KeyOutcome {
        match key {
            KeyInput::Char(c) => {
                let offset = self.byte_offset(self.cursor);
                self.buffer.insert(offset, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let offset = self.byte_offset(self.cursor);
                    self.buffer.remove(offset);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    let offset = self.byte_offset(self.cursor);
                    self.buffer.remove(offset);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => {
                if self.cursor < self.char_count() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_count(),
            KeyInput::Enter => {
                self.cursor = 0;
                return KeyOutcome::Submit(std::mem::take(&mut self.buffer));
            },
            KeyInput::Esc => return KeyOutcome::Quit,
        }

        KeyOutcome::Edited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(input: &mut InputState, text: &str) {
        for c in text.chars() {
            input.handle_key(KeyInput::Char(c));
        }
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();

        type_text(&mut input, "hi");

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = InputState::new();

        type_text(&mut input, "ab");
        input.handle_key(KeyInput::Backspace);

        assert_eq!(input.buffer(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut input = InputState::new();

        type_text(&mut input, "/r general");
        let outcome = input.handle_key(KeyInput::Enter);

        assert_eq!(outcome, KeyOutcome::Submit("/r general".into()));
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn esc_quits() {
        let mut input = InputState::new();
        type_text(&mut input, "half typed");

        assert_eq!(input.handle_key(KeyInput::Esc), KeyOutcome::Quit);
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();
        type_text(&mut input, "abc");

        input.handle_key(KeyInput::Home);
        assert_eq!(input.cursor(), 0);

        input.handle_key(KeyInput::End);
        assert_eq!(input.cursor(), 3);

        input.handle_key(KeyInput::Left);
        assert_eq!(input.cursor(), 2);

        input.handle_key(KeyInput::Right);
        input.handle_key(KeyInput::Right);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn multibyte_editing() {
        let mut input = InputState::new();
        type_text(&mut input, "héllo");

        input.handle_key(KeyInput::Home);
        input.handle_key(KeyInput::Right);
        input.handle_key(KeyInput::Delete);
        assert_eq!(input.buffer(), "hllo");

        input.handle_key(KeyInput::Char('ü'));
        assert_eq!(input.buffer(), "hüllo");

        input.handle_key(KeyInput::End);
        input.handle_key(KeyInput::Backspace);
        assert_eq!(input.buffer(), "hüll");
        assert_eq!(input.cursor(), 4);
    }
}

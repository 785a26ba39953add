//! Terminal loop.
//!
//! Owns the terminal (crossterm raw mode, alternate screen, ratatui
//! rendering) and the prompt. Applies surface commands from the dispatcher
//! and submits typed lines to it. Uses `tokio::select!` over key events,
//! surface commands and shutdown.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use peerchat_app::InputSink;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{InputState, KeyInput, KeyOutcome, SurfaceCommand, TuiError, View, ui};

/// Convert a crossterm key to a prompt key.
pub fn convert_key(code: KeyCode) -> Option<KeyInput> {
    match code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

/// Ctrl-C, which raw mode delivers as a key press.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Terminal UI bound to one session.
///
/// Restores the terminal when dropped.
pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    view: View,
    input: InputState,
}

impl TerminalUi {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        Ok(Self { terminal, view: View::new(), input: InputState::new() })
    }

    /// Run until shutdown or until the user quits.
    ///
    /// Quitting from the keyboard cancels `shutdown`, which also stops the
    /// dispatcher.
    pub async fn run(
        mut self,
        mut surface: mpsc::UnboundedReceiver<SurfaceCommand>,
        sink: InputSink,
        shutdown: CancellationToken,
    ) -> Result<(), TuiError> {
        let mut events = EventStream::new();
        self.render()?;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,

                Some(command) = surface.recv() => {
                    self.view.apply(command);
                    self.render()?;
                }

                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if is_interrupt(&key) {
                            shutdown.cancel();
                            break;
                        }
                        let Some(key_input) = convert_key(key.code) else {
                            continue;
                        };

                        match self.input.handle_key(key_input) {
                            KeyOutcome::Edited => {},
                            KeyOutcome::Submit(line) => {
                                if sink.submit(&line).await.is_err() {
                                    debug!("session closed, input dropped");
                                    break;
                                }
                            },
                            KeyOutcome::Quit => {
                                shutdown.cancel();
                                break;
                            },
                        }
                        self.render()?;
                    },
                    Some(Ok(Event::Resize(..))) => self.render()?,
                    Some(Ok(_)) => {},
                    Some(Err(e)) => return Err(TuiError::Io(e)),
                    None => {
                        shutdown.cancel();
                        break;
                    },
                },
            }
        }

        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.terminal.draw(|frame| ui::render(frame, &self.view, &self.input))?;
        Ok(())
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

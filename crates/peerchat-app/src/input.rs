//! Submission side of the dispatcher's input sources.

use tokio::sync::mpsc;

use crate::{Command, Input, SessionClosed, parse};

/// Handle for submitting typed lines to a [`crate::Dispatcher`].
///
/// Lines are classified here, so chat text and commands reach the dispatcher
/// on separate sources. Cheap to clone.
#[derive(Debug, Clone)]
pub struct InputSink {
    lines: mpsc::Sender<String>,
    commands: mpsc::Sender<Command>,
}

impl InputSink {
    pub(crate) fn new(lines: mpsc::Sender<String>, commands: mpsc::Sender<Command>) -> Self {
        Self { lines, commands }
    }

    /// Submit one line as typed at the prompt.
    ///
    /// Lines that are empty after trimming are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionClosed`] if the dispatcher has stopped.
    pub async fn submit(&self, line: &str) -> Result<(), SessionClosed> {
        if line.trim().is_empty() {
            return Ok(());
        }

        match parse(line) {
            Input::Chat(text) => self.lines.send(text).await.map_err(|_| SessionClosed),
            Input::Command(command) => {
                self.commands.send(command).await.map_err(|_| SessionClosed)
            },
        }
    }
}

//! Slash-command parsing.
//!
//! [`parse`] is total: every line is either chat text or a [`Command`]. Verb
//! validation is deferred to the executor so unknown verbs can be reported
//! by name.

/// Leading character marking a line as a command.
pub const COMMAND_SIGIL: char = '/';

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain chat text, passed through unmodified.
    Chat(String),
    /// A slash command.
    Command(Command),
}

/// A parsed user directive.
///
/// The verb token keeps its sigil (`/r`), so unsupported verbs can be echoed
/// back exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Verb token including the sigil.
    pub verb: String,
    /// Remainder of the line, trimmed. Empty if none was given.
    pub argument: String,
}

impl Command {
    /// Create a command from a verb token and argument.
    pub fn new(verb: impl Into<String>, argument: impl Into<String>) -> Self {
        Self { verb: verb.into(), argument: argument.into() }
    }

    /// The recognized verb. `None` for unsupported tokens.
    pub fn kind(&self) -> Option<Verb> {
        Verb::from_token(&self.verb)
    }
}

/// The fixed set of supported verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `/q`: end the session.
    Quit,
    /// `/r <room>`: leave the current room and join another.
    ChangeRoom,
    /// `/u <name>`: change the display name.
    Rename,
    /// `/send <path>`: share a file with the current room.
    SendFile,
}

impl Verb {
    /// Every supported verb.
    pub const ALL: [Verb; 4] = [Verb::Quit, Verb::ChangeRoom, Verb::Rename, Verb::SendFile];

    /// Look up a verb by its token (sigil included).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "/q" => Some(Self::Quit),
            "/r" => Some(Self::ChangeRoom),
            "/u" => Some(Self::Rename),
            "/send" => Some(Self::SendFile),
            _ => None,
        }
    }

    /// Token typed at the prompt.
    pub fn token(self) -> &'static str {
        match self {
            Self::Quit => "/q",
            Self::ChangeRoom => "/r",
            Self::Rename => "/u",
            Self::SendFile => "/send",
        }
    }

    /// Whether the verb is malformed without an argument.
    pub fn requires_argument(self) -> bool {
        !matches!(self, Self::Quit)
    }

    /// Notice text for a missing argument.
    pub(crate) fn missing_argument(self) -> &'static str {
        match self {
            Self::Quit => "unexpected missing argument",
            Self::ChangeRoom => "missing room name for command",
            Self::Rename => "missing user name for command",
            Self::SendFile => "missing file name for command",
        }
    }
}

/// Classify one input line.
///
/// Callers discard lines that are empty after trimming; any other line is
/// accepted. A line starting with [`COMMAND_SIGIL`] is split on its first run
/// of whitespace into verb and argument.
pub fn parse(line: &str) -> Input {
    if !line.starts_with(COMMAND_SIGIL) {
        return Input::Chat(line.to_owned());
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    Input::Command(Command::new(verb, rest.trim()))
}

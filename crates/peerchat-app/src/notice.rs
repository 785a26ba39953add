//! Log notices shown inline with chat traffic.

/// A categorized, human-readable notice.
///
/// Produced by the executor, the dispatcher, or a room's notice source, and
/// rendered once. Rooms may use categories beyond the ones defined here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNotice {
    /// Category tag, e.g. [`LogNotice::ERROR`].
    pub category: String,
    /// Message text.
    pub text: String,
}

impl LogNotice {
    /// Malformed or unsupported command.
    pub const BAD_COMMAND: &'static str = "bad-command";
    /// A command failed.
    pub const ERROR: &'static str = "error";
    /// A command succeeded.
    pub const INFO: &'static str = "info";
    /// Room migration progress.
    pub const ROOM_CHANGE: &'static str = "room-change";
    /// Command rejected because too many are in flight.
    pub const BUSY: &'static str = "busy";

    /// Create a notice with an arbitrary category.
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self { category: category.into(), text: text.into() }
    }

    /// A [`LogNotice::BAD_COMMAND`] notice.
    pub fn bad_command(text: impl Into<String>) -> Self {
        Self::new(Self::BAD_COMMAND, text)
    }

    /// An [`LogNotice::ERROR`] notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Self::ERROR, text)
    }

    /// An [`LogNotice::INFO`] notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Self::INFO, text)
    }

    /// A [`LogNotice::ROOM_CHANGE`] notice.
    pub fn room_change(text: impl Into<String>) -> Self {
        Self::new(Self::ROOM_CHANGE, text)
    }

    /// A [`LogNotice::BUSY`] notice.
    pub fn busy(text: impl Into<String>) -> Self {
        Self::new(Self::BUSY, text)
    }

    /// Whether this notice has the given category.
    pub fn is(&self, category: &str) -> bool {
        self.category == category
    }
}

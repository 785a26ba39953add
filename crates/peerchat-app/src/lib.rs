//! Session layer for peerchat
//!
//! Serializes every concurrent input of a chat session (typed lines, slash
//! commands, inbound room traffic, room notices, the peer refresh tick and
//! shutdown) through one dispatch loop, and interprets the slash-command
//! protocol that can move the session between rooms.
//!
//! # Components
//!
//! - [`parse`]: total classifier turning an input line into chat text or a
//!   [`Command`]
//! - [`execute`]: command executor, run as an independent task per command
//! - [`Dispatcher`]: the single serialization point owning the [`Session`]
//! - [`Room`] / [`Host`]: transport contracts consumed by the session
//! - [`Surface`]: display contract the dispatcher renders into

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod config;
mod dispatcher;
mod drain;
mod error;
mod event;
mod executor;
mod input;
mod notice;
mod room;
mod session;
mod surface;

pub use command::{COMMAND_SIGIL, Command, Input, Verb, parse};
pub use config::SessionConfig;
pub use dispatcher::Dispatcher;
pub use error::{RoomError, SessionClosed};
pub use event::{ChatEvent, PeerId, PeerMessage};
pub use executor::{CommandContext, CommandOutcome, execute};
pub use input::InputSink;
pub use notice::LogNotice;
pub use room::{Host, Joined, Room};
pub use session::Session;
pub use surface::{Line, LineKind, Surface, input_label, migrated_title};

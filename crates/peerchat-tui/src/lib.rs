//! Terminal client for peerchat
//!
//! Renders a [`peerchat_app::Dispatcher`] session with ratatui and feeds it
//! lines typed at a crossterm prompt. Rooms are provided by the in-process
//! simulated host, with a few simulated peers chatting in the background.
//!
//! The dispatcher never touches the terminal: it drives a [`TerminalSurface`]
//! whose commands are applied to a [`View`] by the [`TerminalUi`] loop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod chatter;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod surface;
pub mod terminal;
pub mod ui;
pub mod view;

pub use error::TuiError;
pub use input::{InputState, KeyInput, KeyOutcome};
pub use runtime::{Runtime, RuntimeConfig};
pub use surface::{SurfaceCommand, TerminalSurface};
pub use terminal::TerminalUi;
pub use view::View;

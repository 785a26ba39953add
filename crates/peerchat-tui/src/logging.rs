//! Logging setup.
//!
//! The terminal is in raw mode while the client runs, so logs go to a file.

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::TuiError;

/// Install a global subscriber appending to `path`.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init(path: &Path, level: &str) -> Result<(), TuiError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))
}

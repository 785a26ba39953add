//! Session tuning knobs.

use std::time::Duration;

/// Configuration for a [`crate::Dispatcher`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interval between peer-list refreshes.
    pub tick_interval: Duration,
    /// Maximum number of command tasks running at once. Commands arriving
    /// while at capacity are rejected with a `busy` notice.
    pub max_inflight_commands: usize,
    /// Capacity of the line and command input channels.
    pub channel_capacity: usize,
}

impl SessionConfig {
    const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

    /// Tick interval clamped to a usable minimum.
    pub(crate) fn effective_tick_interval(&self) -> Duration {
        self.tick_interval.max(Self::MIN_TICK_INTERVAL)
    }

    /// Command task limit clamped to at least one task.
    pub(crate) fn effective_max_inflight_commands(&self) -> usize {
        self.max_inflight_commands.max(1)
    }

    /// Channel capacity clamped to at least one slot.
    pub(crate) fn effective_channel_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            max_inflight_commands: 8,
            channel_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_are_clamped() {
        let config = SessionConfig {
            tick_interval: Duration::ZERO,
            max_inflight_commands: 0,
            channel_capacity: 0,
        };

        assert_eq!(config.effective_tick_interval(), Duration::from_millis(10));
        assert_eq!(config.effective_max_inflight_commands(), 1);
        assert_eq!(config.effective_channel_capacity(), 1);
    }

    #[test]
    fn default_refreshes_peers_every_second() {
        assert_eq!(SessionConfig::default().effective_tick_interval(), Duration::from_secs(1));
    }
}

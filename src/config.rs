use std::time::Duration;

use crate::game::DEFAULT_DROP_INTERVAL_MS;
use crate::input::DEFAULT_KEY_REPEAT_MS;

pub const DEFAULT_FRAME_MS: u64 = 16;

/// Runtime options for a session. Grid size is not among them: it is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Gravity interval fed to the drop accumulator.
    pub drop_interval_ms: u64,
    /// Minimum delay between accepted repeats of a held move key.
    pub key_repeat_ms: u64,
    /// Poll/render cadence of the driver loop.
    pub frame_ms: u64,
    /// Seed for the piece generator; entropy when `None`.
    pub seed: Option<u64>,
    pub mouse: bool,
}

impl GameConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn key_repeat_delay(&self) -> Duration {
        Duration::from_millis(self.key_repeat_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            drop_interval_ms: DEFAULT_DROP_INTERVAL_MS,
            key_repeat_ms: DEFAULT_KEY_REPEAT_MS,
            frame_ms: DEFAULT_FRAME_MS,
            seed: None,
            mouse: true,
        }
    }
}

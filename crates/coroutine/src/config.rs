//! Tick cadence configuration.

use std::time::Duration;

/// Describes how much time one external tick stands for.
///
/// The scheduler itself only counts ticks. Seconds-based waits use this to
/// convert a duration into a tick count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickConfig {
    /// Simulated time covered by a single tick.
    pub tick_duration: Duration,
}

impl TickConfig {
    /// Ticks per second assumed when nothing else is configured.
    pub const DEFAULT_TICK_RATE: u32 = 60;

    pub fn new() -> Self {
        Self::with_tick_rate(Self::DEFAULT_TICK_RATE)
    }

    pub fn with_tick_duration(tick_duration: Duration) -> Self {
        Self { tick_duration }
    }

    /// Builds a config from a rate in ticks per second. A rate of zero yields
    /// a zero tick duration.
    pub fn with_tick_rate(ticks_per_second: u32) -> Self {
        let tick_duration = Duration::from_secs(1)
            .checked_div(ticks_per_second)
            .unwrap_or(Duration::ZERO);
        Self { tick_duration }
    }

    /// Number of ticks needed to cover `duration`, rounded up.
    ///
    /// Returns zero for a zero duration or a zero tick duration.
    pub fn ticks_for(&self, duration: Duration) -> u64 {
        let tick = self.tick_duration.as_nanos();
        if tick == 0 {
            return 0;
        }
        let ticks = duration.as_nanos().div_ceil(tick);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self::new()
    }
}

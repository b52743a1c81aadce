//! Waiting leaves.
//!
//! There is no timer in the scheduler. Waiting is an ordinary sequence that
//! suspends until enough ticks (or enough accumulated time) have passed, and
//! is embedded with a call instruction.

use std::time::Duration;

use crate::config::TickConfig;
use crate::error::Result;
use crate::instruction::Instruction;
use crate::sequence::Sequence;

/// Suspends for a fixed number of ticks. See [`wait_ticks`].
#[derive(Debug, Clone)]
pub struct WaitTicks {
    remaining: u64,
}

/// Suspends `ticks` times, then completes.
///
/// Called from a sequence, the caller resumes `ticks` updates after the call.
pub fn wait_ticks(ticks: u64) -> WaitTicks {
    WaitTicks { remaining: ticks }
}

/// Suspends for as many ticks as `duration` spans under `config`.
pub fn wait_for(duration: Duration, config: &TickConfig) -> WaitTicks {
    wait_ticks(config.ticks_for(duration))
}

impl<T> Sequence<T> for WaitTicks {
    fn resume(&mut self) -> Result<Option<Instruction<T>>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Instruction::Suspend))
    }
}

/// Suspends until a delta source has accumulated a duration. See
/// [`wait_elapsed`].
pub struct WaitElapsed<F> {
    remaining: Duration,
    delta: F,
    started: bool,
}

/// Suspends until the durations reported by `delta` add up to `duration`.
///
/// `delta` is sampled once per tick after the first, the way a frame loop
/// reports the time elapsed since the previous frame.
pub fn wait_elapsed<F>(duration: Duration, delta: F) -> WaitElapsed<F>
where
    F: FnMut() -> Duration,
{
    WaitElapsed {
        remaining: duration,
        delta,
        started: false,
    }
}

impl<T, F> Sequence<T> for WaitElapsed<F>
where
    F: FnMut() -> Duration,
{
    fn resume(&mut self) -> Result<Option<Instruction<T>>> {
        if self.started {
            self.remaining = self.remaining.saturating_sub((self.delta)());
        }
        self.started = true;
        if self.remaining.is_zero() {
            return Ok(None);
        }
        Ok(Some(Instruction::Suspend))
    }
}

//! src/wait.rs
//!
//! Bounded timed-wait primitives.
//!
//! Each call builds its own mutex and condition variable, waits on them, and
//! tears both down before returning; there is no shared state between calls
//! and nothing ever notifies the condition variable, so a wait always runs
//! out its full duration. Useful standalone, and as the backoff primitive
//! for polling loops built on
//! [`PoolContext::should_stop`](crate::PoolContext::should_stop).
//!
//! The deadline is armed against the wall clock, so reading the clock is the
//! one fallible step; it surfaces as [`ClockError`] rather than aborting
//! anything.

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, SystemTime, SystemTimeError, UNIX_EPOCH};

use thiserror::Error;

/// The wall clock could not be read while arming or checking a timed wait.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("system clock read failed: {0}")]
    ClockRead(#[from] SystemTimeError),
}

/// Blocks the calling thread for `duration`.
///
/// Only the calling thread is affected. Spurious wakeups of the underlying
/// condition variable are absorbed by re-waiting for the remainder, so the
/// elapsed time is at least `duration` up to clock granularity.
pub fn wait_for(duration: Duration) -> Result<(), ClockError> {
    let deadline = wall_clock_now()?.saturating_add(duration);

    let gate = Mutex::new(());
    let wakeup = Condvar::new();

    let mut guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
    loop {
        let now = wall_clock_now()?;
        if now >= deadline {
            return Ok(());
        }
        let (reacquired, _timed_out) = wakeup
            .wait_timeout(guard, deadline - now)
            .unwrap_or_else(PoisonError::into_inner);
        guard = reacquired;
    }
}

/// Seconds variant of [`wait_for`]. Negative durations are treated as zero.
pub fn wait_seconds(secs: i64) -> Result<(), ClockError> {
    wait_for(Duration::from_secs(secs.max(0) as u64))
}

/// Millisecond variant of [`wait_for`].
///
/// A non-positive duration returns immediately with success, without
/// consulting the clock.
pub fn wait_millis(millis: i64) -> Result<(), ClockError> {
    if millis <= 0 {
        return Ok(());
    }
    wait_for(Duration::from_millis(millis as u64))
}

fn wall_clock_now() -> Result<Duration, ClockError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_wait_millis_nonpositive_is_immediate() -> Result<(), ClockError> {
        let start = Instant::now();
        wait_millis(0)?;
        wait_millis(-25)?;
        assert!(start.elapsed() < Duration::from_millis(50));
        Ok(())
    }

    #[test]
    fn test_wait_millis_blocks_for_at_least_the_duration() -> Result<(), ClockError> {
        let start = Instant::now();
        wait_millis(50)?;
        // Allow a little scheduler and clock-granularity slack downwards.
        assert!(start.elapsed() >= Duration::from_millis(40));
        Ok(())
    }

    #[test]
    fn test_wait_seconds_negative_is_immediate() -> Result<(), ClockError> {
        let start = Instant::now();
        wait_seconds(-1)?;
        assert!(start.elapsed() < Duration::from_millis(50));
        Ok(())
    }

    #[test]
    fn test_wait_for_elapses() -> Result<(), ClockError> {
        let start = Instant::now();
        wait_for(Duration::from_millis(30))?;
        assert!(start.elapsed() >= Duration::from_millis(20));
        Ok(())
    }
}

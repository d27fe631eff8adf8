//! core::ops::poll
//!
//! Polling driver for non-blocking acquisition attempts.
//!
//! # Architecture
//!
//! The driver owns every timing concern (deadline, pause between attempts) so
//! that the attempt itself stays a plain function of the filesystem. Time is
//! read through the [`Clock`] trait; tests substitute a manual clock that
//! advances instantly instead of sleeping.
//!
//! # Invariants
//!
//! - The attempt is always made at least once, even with a zero timeout
//! - A pause never extends past the deadline
//! - A failed (non-busy) attempt is returned immediately and never retried
//! - A clock that reports itself cancelled after a pause stops the loop
//!   before the next attempt

use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

/// Source of time for the polling driver.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Pause for `duration`. May return early.
    fn sleep(&self, duration: Duration);

    /// Whether waiting should stop. Checked after every pause.
    fn cancelled(&self) -> bool {
        false
    }
}

/// The real clock: `Instant::now` and `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Outcome of a single attempt.
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// The resource was obtained.
    Ready(T),
    /// The resource is held elsewhere; try again later.
    Busy,
    /// A fault unrelated to contention.
    Failed(E),
}

/// Why polling stopped without a result.
#[derive(Debug)]
pub enum PollError<E> {
    /// The deadline passed while the resource was still busy.
    TimedOut {
        /// Time spent between the first attempt and giving up.
        waited: Duration,
    },
    /// An attempt failed for a reason other than contention.
    Failed(E),
    /// The clock was cancelled while waiting.
    Cancelled {
        /// Time spent between the first attempt and giving up.
        waited: Duration,
    },
}

/// Run `attempt` until it is ready, fails, or the timeout elapses.
///
/// With `timeout = None` the driver retries forever. With
/// `Some(Duration::ZERO)` exactly one attempt is made.
pub fn poll_until<T, E, C, F>(
    clock: &C,
    interval: Duration,
    timeout: Option<Duration>,
    mut attempt: F,
) -> Result<T, PollError<E>>
where
    C: Clock + ?Sized,
    F: FnMut() -> Attempt<T, E>,
{
    let started = clock.now();
    // A timeout too large to represent is the same as no timeout.
    let deadline = timeout.and_then(|t| started.checked_add(t));
    let mut attempts: u64 = 0;

    loop {
        attempts += 1;
        match attempt() {
            Attempt::Ready(value) => return Ok(value),
            Attempt::Failed(err) => return Err(PollError::Failed(err)),
            Attempt::Busy => {}
        }

        let now = clock.now();
        let pause = match deadline {
            Some(deadline) if now >= deadline => {
                return Err(PollError::TimedOut {
                    waited: now.saturating_duration_since(started),
                });
            }
            Some(deadline) => interval.min(deadline - now),
            None => interval,
        };

        trace!(attempts, ?pause, "resource busy, retrying");
        clock.sleep(pause);

        if clock.cancelled() {
            return Err(PollError::Cancelled {
                waited: clock.now().saturating_duration_since(started),
            });
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn ready_on_first_attempt_never_sleeps() {
        let clock = ManualClock::new();
        let result: Result<u32, PollError<()>> =
            poll_until(&clock, INTERVAL, None, || Attempt::Ready(7));

        assert_eq!(result.unwrap(), 7);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn busy_then_ready_sleeps_between_attempts() {
        let clock = ManualClock::new();
        let mut remaining_busy = 3;

        let result: Result<&str, PollError<()>> = poll_until(&clock, INTERVAL, None, || {
            if remaining_busy == 0 {
                Attempt::Ready("done")
            } else {
                remaining_busy -= 1;
                Attempt::Busy
            }
        });

        assert_eq!(result.unwrap(), "done");
        assert_eq!(clock.sleeps(), vec![INTERVAL; 3]);
    }

    #[test]
    fn zero_timeout_makes_exactly_one_attempt() {
        let clock = ManualClock::new();
        let mut calls = 0;

        let result: Result<(), PollError<()>> =
            poll_until(&clock, INTERVAL, Some(Duration::ZERO), || {
                calls += 1;
                Attempt::Busy
            });

        assert!(matches!(result, Err(PollError::TimedOut { waited }) if waited == Duration::ZERO));
        assert_eq!(calls, 1);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn deadline_is_enforced() {
        let clock = ManualClock::new();
        let timeout = Duration::from_millis(250);

        let result: Result<(), PollError<()>> =
            poll_until(&clock, INTERVAL, Some(timeout), || Attempt::Busy);

        match result {
            Err(PollError::TimedOut { waited }) => assert_eq!(waited, timeout),
            other => panic!("expected timeout, got {:?}", other),
        }
        // Last pause is shortened so the deadline is not overshot.
        assert_eq!(
            clock.sleeps(),
            vec![INTERVAL, INTERVAL, Duration::from_millis(50)]
        );
        assert_eq!(clock.total_slept(), timeout);
    }

    #[test]
    fn success_at_the_deadline_wins() {
        let clock = ManualClock::new();
        let mut calls = 0;

        let result: Result<u8, PollError<()>> =
            poll_until(&clock, INTERVAL, Some(INTERVAL), || {
                calls += 1;
                if calls == 2 {
                    Attempt::Ready(1)
                } else {
                    Attempt::Busy
                }
            });

        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn failure_is_not_retried() {
        let clock = ManualClock::new();
        let mut calls = 0;

        let result: Result<(), PollError<&str>> = poll_until(&clock, INTERVAL, None, || {
            calls += 1;
            Attempt::Failed("permission denied")
        });

        assert!(matches!(result, Err(PollError::Failed("permission denied"))));
        assert_eq!(calls, 1);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn cancellation_stops_waiting_after_the_pause() {
        let clock = ManualClock::new().cancel_after(2);
        let mut calls = 0;

        let result: Result<(), PollError<()>> = poll_until(&clock, INTERVAL, None, || {
            calls += 1;
            Attempt::Busy
        });

        match result {
            Err(PollError::Cancelled { waited }) => assert_eq!(waited, INTERVAL * 2),
            other => panic!("expected cancellation, got {:?}", other),
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn cancellation_is_not_checked_before_first_attempt() {
        let clock = ManualClock::new().cancel_after(0);

        let result: Result<u8, PollError<()>> =
            poll_until(&clock, INTERVAL, None, || Attempt::Ready(3));

        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn huge_timeout_behaves_like_none() {
        let clock = ManualClock::new();
        let mut calls = 0;

        let result: Result<(), PollError<()>> =
            poll_until(&clock, INTERVAL, Some(Duration::MAX), || {
                calls += 1;
                if calls > 5 {
                    Attempt::Ready(())
                } else {
                    Attempt::Busy
                }
            });

        assert!(result.is_ok());
        assert_eq!(clock.sleeps().len(), 5);
    }
}

//! Local countdown between authoritative time updates
//!
//! The server owns the real round clock and only sends the remaining time when
//! a round resumes. Between those updates the client extrapolates locally by
//! removing a fixed step on every tick. The countdown does not stop on its own
//! when it reaches zero; the session stops it when the round is paused or reset.
//!
//! Ticks are driven from outside through the [`Ticker`] trait. Every call to
//! [`Countdown::start`] cancels the previous schedule and hands out a fresh
//! [`TickHandle`]; ticks carrying any other handle are ignored, so at most one
//! schedule ever decrements the countdown.

use std::{sync::Arc, time::Duration};

use derive_where::derive_where;
use web_time::Instant;

/// Identifies one started countdown schedule
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("tick#{_0}")]
pub struct TickHandle(u64);

/// Source of periodic ticks
///
/// Implementations deliver ticks for a handle back to the owner of the
/// countdown (for instance through a channel) until the handle is cancelled.
pub trait Ticker {
    /// Starts delivering ticks for `handle` every `period`
    fn schedule(&mut self, handle: TickHandle, period: Duration);

    /// Stops delivering ticks for `handle`
    ///
    /// Cancelling a handle that is not scheduled does nothing.
    fn cancel(&mut self, handle: TickHandle);
}

/// Ticker that only records schedules, leaving tick delivery to the caller
///
/// Useful for headless replays and tests, where ticks are fed by hand.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    active: Option<TickHandle>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualTicker {
    /// The handle currently scheduled, if any
    pub fn active(&self) -> Option<TickHandle> {
        self.active
    }

    /// Number of schedules started so far
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    /// Number of schedules cancelled so far
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl Ticker for ManualTicker {
    fn schedule(&mut self, handle: TickHandle, _period: Duration) {
        self.active = Some(handle);
        self.scheduled += 1;
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.active == Some(handle) {
            self.active = None;
            self.cancelled += 1;
        }
    }
}

/// Monotonic clock used for drift corrected countdowns
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Clock backed by the platform monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Formats a remaining time as seconds with one decimal place
///
/// Halves round up, e.g. 12 250ms is shown as `12.3`. Negative values are
/// shown as zero.
pub fn format_remaining(remaining_ms: i64) -> String {
    let tenths = remaining_ms.max(0).saturating_add(50) / 100;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Locally ticking approximation of the remaining round time
#[derive_where(Debug)]
pub struct Countdown<T> {
    /// Remaining time in milliseconds, may go below zero
    remaining_ms: i64,
    /// Tick period, also the amount removed per tick
    period: Duration,
    /// Handle of the running schedule
    active: Option<TickHandle>,
    /// Counter used to mint handles
    last_handle: u64,
    /// Instant and remaining time of the last start, when drift correction is on
    anchor: Option<(Instant, i64)>,
    #[derive_where(skip)]
    clock: Option<Arc<dyn Clock>>,
    #[derive_where(skip)]
    ticker: T,
}

impl<T: Ticker> Countdown<T> {
    /// Creates a stopped countdown at zero
    ///
    /// # Arguments
    ///
    /// * `ticker` - Source of ticks for started countdowns
    /// * `period` - Time between ticks, also removed from the remaining time per tick
    pub fn new(ticker: T, period: Duration) -> Self {
        Self {
            remaining_ms: 0,
            period,
            active: None,
            last_handle: 0,
            anchor: None,
            clock: None,
            ticker,
        }
    }

    /// Derives the remaining time from `clock` instead of fixed steps
    ///
    /// Each tick then recomputes the remaining time from the instant of the
    /// last [`start`](Self::start), which absorbs late or skipped ticks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Starts counting down from `initial_ms`
    ///
    /// Any running schedule is cancelled first.
    ///
    /// # Returns
    ///
    /// The handle ticks must carry to affect this countdown
    pub fn start(&mut self, initial_ms: i64) -> TickHandle {
        self.stop();
        self.remaining_ms = initial_ms;
        self.last_handle += 1;
        let handle = TickHandle(self.last_handle);
        self.anchor = self.clock.as_ref().map(|clock| (clock.now(), initial_ms));
        self.ticker.schedule(handle, self.period);
        self.active = Some(handle);
        handle
    }

    /// Cancels the running schedule, keeping the remaining time
    ///
    /// # Returns
    ///
    /// `false` if nothing was running
    pub fn stop(&mut self) -> bool {
        self.anchor = None;
        match self.active.take() {
            Some(handle) => {
                self.ticker.cancel(handle);
                true
            }
            None => false,
        }
    }

    /// Applies one tick
    ///
    /// # Returns
    ///
    /// `false` if `handle` does not belong to the running schedule, in which
    /// case the remaining time is untouched
    pub fn tick(&mut self, handle: TickHandle) -> bool {
        if self.active != Some(handle) {
            return false;
        }

        match (&self.anchor, &self.clock) {
            (Some((started, initial_ms)), Some(clock)) => {
                let elapsed = clock.now().saturating_duration_since(*started);
                let elapsed_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
                self.remaining_ms = initial_ms.saturating_sub(elapsed_ms);
            }
            _ => {
                let step = i64::try_from(self.period.as_millis()).unwrap_or(i64::MAX);
                self.remaining_ms = self.remaining_ms.saturating_sub(step);
            }
        }
        true
    }

    /// Overwrites the remaining time without touching the schedule
    pub fn set_remaining(&mut self, remaining_ms: i64) {
        self.remaining_ms = remaining_ms;
    }

    /// Remaining time in milliseconds
    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    /// Remaining time formatted for display
    pub fn display(&self) -> String {
        format_remaining(self.remaining_ms)
    }

    /// Whether a schedule is running
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Handle of the running schedule
    pub fn active_handle(&self) -> Option<TickHandle> {
        self.active
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The tick source
    pub fn ticker(&self) -> &T {
        &self.ticker
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    struct TestClock(Mutex<Instant>);

    impl TestClock {
        fn new() -> Self {
            Self(Mutex::new(Instant::now()))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            *self.0.lock().unwrap()
        }
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(30_000), "30.0");
        assert_eq!(format_remaining(29_900), "29.9");
        assert_eq!(format_remaining(150), "0.2");
        assert_eq!(format_remaining(149), "0.1");
        assert_eq!(format_remaining(250), "0.3");
        assert_eq!(format_remaining(12_250), "12.3");
        assert_eq!(format_remaining(12_749), "12.7");
        assert_eq!(format_remaining(0), "0.0");
        assert_eq!(format_remaining(-300), "0.0");
    }

    #[test]
    fn test_tick_decrements_by_period() {
        let mut countdown = Countdown::new(ManualTicker::default(), PERIOD);
        let handle = countdown.start(1_000);

        assert!(countdown.tick(handle));
        assert!(countdown.tick(handle));

        assert_eq!(countdown.remaining_ms(), 800);
        assert_eq!(countdown.display(), "0.8");
    }

    #[test]
    fn test_does_not_stop_at_zero() {
        let mut countdown = Countdown::new(ManualTicker::default(), PERIOD);
        let handle = countdown.start(100);

        assert!(countdown.tick(handle));
        assert!(countdown.tick(handle));

        assert!(countdown.is_running());
        assert_eq!(countdown.remaining_ms(), -100);
        assert_eq!(countdown.display(), "0.0");
    }

    #[test]
    fn test_tick_saturates_at_minimum() {
        let mut countdown = Countdown::new(ManualTicker::default(), PERIOD);
        let handle = countdown.start(i64::MIN + 50);

        assert!(countdown.tick(handle));
        assert!(countdown.tick(handle));

        assert_eq!(countdown.remaining_ms(), i64::MIN);
        assert_eq!(countdown.display(), "0.0");
    }

    #[test]
    fn test_restart_invalidates_previous_handle() {
        let mut countdown = Countdown::new(ManualTicker::default(), PERIOD);
        let first = countdown.start(5_000);
        let second = countdown.start(3_000);

        assert_ne!(first, second);
        assert!(!countdown.tick(first));
        assert_eq!(countdown.remaining_ms(), 3_000);

        assert!(countdown.tick(second));
        assert_eq!(countdown.remaining_ms(), 2_900);

        let ticker = countdown.ticker();
        assert_eq!(ticker.active(), Some(second));
        assert_eq!(ticker.scheduled_count(), 2);
        assert_eq!(ticker.cancelled_count(), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut countdown = Countdown::new(ManualTicker::default(), PERIOD);
        assert!(!countdown.stop());

        let handle = countdown.start(2_000);
        countdown.tick(handle);

        assert!(countdown.stop());
        assert!(!countdown.stop());
        assert!(!countdown.tick(handle));
        assert_eq!(countdown.remaining_ms(), 1_900);
        assert_eq!(countdown.ticker().active(), None);
        assert_eq!(countdown.ticker().cancelled_count(), 1);
    }

    #[test]
    fn test_set_remaining_keeps_schedule() {
        let mut countdown = Countdown::new(ManualTicker::default(), PERIOD);
        let handle = countdown.start(2_000);

        countdown.set_remaining(10_000);

        assert_eq!(countdown.active_handle(), Some(handle));
        assert_eq!(countdown.remaining_ms(), 10_000);
    }

    #[test]
    fn test_drift_correction_follows_clock() {
        let clock = Arc::new(TestClock::new());
        let mut countdown =
            Countdown::new(ManualTicker::default(), PERIOD).with_clock(clock.clone());
        let handle = countdown.start(10_000);

        // a single late tick catches up with the real elapsed time
        clock.advance(Duration::from_millis(750));
        assert!(countdown.tick(handle));
        assert_eq!(countdown.remaining_ms(), 9_250);

        clock.advance(Duration::from_millis(250));
        assert!(countdown.tick(handle));
        assert_eq!(countdown.remaining_ms(), 9_000);
    }

    #[test]
    fn test_drift_correction_reanchors_on_start() {
        let clock = Arc::new(TestClock::new());
        let mut countdown =
            Countdown::new(ManualTicker::default(), PERIOD).with_clock(clock.clone());
        countdown.start(10_000);
        clock.advance(Duration::from_secs(2));

        let handle = countdown.start(4_000);
        clock.advance(Duration::from_millis(100));
        assert!(countdown.tick(handle));

        assert_eq!(countdown.remaining_ms(), 3_900);
    }
}

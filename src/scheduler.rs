//! Fixed-cadence tick scheduling.
//!
//! The loop driver feeds wall-clock time in and gets back how many simulation
//! ticks are due.  Rendering is not scheduled here; the driver redraws only
//! after something changed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::constants::MAX_CATCH_UP_TICKS;

/// Cloneable cancellation flag shared between the loop and anything that
/// may want to end it (quit key, input thread).
#[derive(Clone, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        StopHandle(Arc::new(AtomicBool::new(false)))
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        StopHandle::new()
    }
}

#[derive(Debug)]
pub struct FixedStepScheduler {
    period: Duration,
    accumulator: Duration,
    max_catch_up: u32,
    stop: StopHandle,
}

impl FixedStepScheduler {
    pub fn new(period: Duration) -> Self {
        FixedStepScheduler {
            period: period.max(Duration::from_micros(1)),
            accumulator: Duration::ZERO,
            max_catch_up: MAX_CATCH_UP_TICKS,
            stop: StopHandle::new(),
        }
    }

    pub fn with_max_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up.max(1);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Account for `elapsed` wall time and return the number of ticks due.
    ///
    /// A stopped scheduler never reports ticks.  When the caller falls more
    /// than `max_catch_up` ticks behind, the surplus is dropped instead of
    /// being replayed in a burst.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.accumulator += elapsed;

        let mut due = 0;
        while self.accumulator >= self.period && due < self.max_catch_up {
            self.accumulator -= self.period;
            due += 1;
        }
        if self.accumulator >= self.period {
            let dropped = self.accumulator.as_nanos() / self.period.as_nanos();
            warn!("simulation fell behind, dropping {} ticks", dropped);
            self.accumulator = Duration::from_nanos(
                (self.accumulator.as_nanos() % self.period.as_nanos()) as u64,
            );
        }
        due
    }

    /// Wall time left before the next tick becomes due.
    pub fn time_until_next_tick(&self) -> Duration {
        self.period.saturating_sub(self.accumulator)
    }
}

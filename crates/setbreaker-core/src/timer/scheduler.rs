//! Tick source abstraction.
//!
//! The controller never owns a clock. It asks a [`TickScheduler`] to start or
//! stop delivering ticks and the host (a runtime interval, a UI run loop, or a
//! test) calls back into `TimerController::tick()`.

use std::time::Duration;

/// Period between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A cancellable periodic tick source.
///
/// `arm` on an armed scheduler must not create a second source.
pub trait TickScheduler {
    fn arm(&mut self, period: Duration);
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
}

/// Scheduler stepped by hand. Records how often it was armed and cancelled so
/// tests can assert there is never more than one live source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    period: Option<Duration>,
    arms: usize,
    cancels: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a new source was actually created.
    pub fn arm_count(&self) -> usize {
        self.arms
    }

    /// Number of times a live source was torn down.
    pub fn cancel_count(&self) -> usize {
        self.cancels
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl TickScheduler for ManualScheduler {
    fn arm(&mut self, period: Duration) {
        if self.period.is_none() {
            self.period = Some(period);
            self.arms += 1;
        }
    }

    fn cancel(&mut self) {
        if self.period.take().is_some() {
            self.cancels += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.period.is_some()
    }
}

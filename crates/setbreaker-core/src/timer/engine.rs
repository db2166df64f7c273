//! Rest timer state machine.
//!
//! The engine is pure state: it owns no clock and performs no side effects.
//! The caller (normally [`TimerController`](super::TimerController)) decides
//! when a second has passed and calls `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle <-> Running -> Expired -> (Idle | Running)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = RestTimer::new(60);
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::RestCompleted) on expiry
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::{format_clock, URGENT_BELOW_SECS};
use crate::events::Event;
use crate::gate::ExpiryAlert;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    /// Countdown reached zero and the user has not acknowledged it yet.
    Expired,
}

/// Countdown over a single rest period.
///
/// Invariant: `remaining_secs <= rest_period_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestTimer {
    rest_period_secs: u32,
    remaining_secs: u32,
    phase: TimerPhase,
}

impl RestTimer {
    /// Create an idle timer with the full rest period remaining.
    pub fn new(rest_period_secs: u32) -> Self {
        Self {
            rest_period_secs,
            remaining_secs: rest_period_secs,
            phase: TimerPhase::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn rest_period_secs(&self) -> u32 {
        self.rest_period_secs
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn is_expired(&self) -> bool {
        self.phase == TimerPhase::Expired
    }

    /// `mm:ss` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// Whether the display should switch to its alternate color.
    pub fn is_urgent(&self) -> bool {
        self.remaining_secs < URGENT_BELOW_SECS
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle -> Running. Returns `None` when already running or expired.
    pub fn start(&mut self) -> Option<Event> {
        match self.phase {
            TimerPhase::Idle => {
                self.phase = TimerPhase::Running;
                Some(Event::TimerStarted {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerPhase::Running | TimerPhase::Expired => None,
        }
    }

    /// Running -> Idle, keeping the remaining time.
    pub fn pause(&mut self) -> Option<Event> {
        match self.phase {
            TimerPhase::Running => {
                self.phase = TimerPhase::Idle;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Call once per second. Returns `Some(Event::RestCompleted)` on the tick
    /// that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.phase = TimerPhase::Expired;
            return Some(Event::RestCompleted {
                alert: ExpiryAlert::default(),
                at: Utc::now(),
            });
        }
        Some(Event::TimerTicked {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Any phase -> Idle with the full rest period remaining.
    pub fn reset(&mut self) -> Event {
        self.phase = TimerPhase::Idle;
        self.remaining_secs = self.rest_period_secs;
        Event::TimerReset {
            rest_period_secs: self.rest_period_secs,
            at: Utc::now(),
        }
    }

    /// Refill the clock and run again without going through Idle.
    pub fn extend(&mut self) -> Event {
        self.remaining_secs = self.rest_period_secs;
        self.phase = TimerPhase::Running;
        Event::TimerStarted {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Adopt a new rest period. The remaining time only shrinks to keep the
    /// invariant; growing the period takes effect on the next reset.
    pub fn set_rest_period(&mut self, rest_period_secs: u32) {
        self.rest_period_secs = rest_period_secs;
        self.remaining_secs = self.remaining_secs.min(rest_period_secs);
    }
}

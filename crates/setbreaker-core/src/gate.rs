//! Content gate.
//!
//! Blocks the feed once a rest period runs out. The gate holds no state of its
//! own worth persisting: it mirrors whether the timer is `Expired` and only
//! remembers the last value so changes can be reported once.

use serde::{Deserialize, Serialize};

use crate::timer::TimerPhase;

pub const BLOCKED_MESSAGE: &str = "Time to start your next set!";
pub const ALERT_TITLE: &str = "Rest Period Complete!";

/// How the user answered the end-of-rest alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckChoice {
    /// Back to work: reset the clock and unblock.
    StartNextSet,
    /// More rest: refill the clock and keep counting.
    ExtendRest,
}

impl AckChoice {
    pub fn label(self) -> &'static str {
        match self {
            AckChoice::StartNextSet => "Start Next Set",
            AckChoice::ExtendRest => "Extend Rest",
        }
    }
}

/// Alert surfaced when the countdown reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryAlert {
    pub title: String,
    pub message: String,
    pub choices: Vec<AckChoice>,
}

impl Default for ExpiryAlert {
    fn default() -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            message: BLOCKED_MESSAGE.to_string(),
            choices: vec![AckChoice::StartNextSet, AckChoice::ExtendRest],
        }
    }
}

/// Dimmed layer drawn over the viewport while blocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub message: String,
    /// Opacity of the dimming layer, 0.0..=1.0.
    pub dim: f32,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            message: BLOCKED_MESSAGE.to_string(),
            dim: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentGate {
    blocked: bool,
}

impl ContentGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(phase: TimerPhase) -> bool {
        phase == TimerPhase::Expired
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Whether the viewport should accept input.
    pub fn is_interactive(&self) -> bool {
        !self.blocked
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.blocked.then(Overlay::default)
    }

    /// Re-derive from the timer phase. Returns the new value if it changed.
    pub fn sync(&mut self, phase: TimerPhase) -> Option<bool> {
        let blocked = Self::blocks(phase);
        if blocked == self.blocked {
            return None;
        }
        self.blocked = blocked;
        Some(blocked)
    }
}

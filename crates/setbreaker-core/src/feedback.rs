//! Haptic / notification feedback collaborator.
//!
//! Calls are fire-and-forget. The device behind the trait is the host's
//! business; the core only decides *when* and *how hard* to pulse.

use serde::{Deserialize, Serialize};

/// Pulse strength, mirroring the usual impact generator styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    Medium,
    Soft,
    Rigid,
}

pub trait Feedback {
    fn pulse(&mut self, intensity: Intensity);

    /// Distinct notification used once when the rest period runs out.
    fn warning(&mut self);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn pulse(&mut self, _intensity: Intensity) {}
    fn warning(&mut self) {}
}

/// One recorded feedback call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCall {
    Pulse(Intensity),
    Warning,
}

/// Keeps every call in order. Useful for tests and for replaying what a device
/// would have felt.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    calls: Vec<FeedbackCall>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[FeedbackCall] {
        &self.calls
    }

    pub fn count(&self, call: FeedbackCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl Feedback for RecordingFeedback {
    fn pulse(&mut self, intensity: Intensity) {
        self.calls.push(FeedbackCall::Pulse(intensity));
    }

    fn warning(&mut self) {
        self.calls.push(FeedbackCall::Warning);
    }
}

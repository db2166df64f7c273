//! Scroll monitor.
//!
//! Turns a stream of drag callbacks into at most one "scrolled" signal per drag
//! gesture. The signal fires the first time the content offset moves more than
//! [`SCROLL_THRESHOLD`] away from where the drag began.

use tracing::trace;

/// Distance (in viewport points) a drag must travel to count as scrolling.
pub const SCROLL_THRESHOLD: f64 = 20.0;

/// Emitted once per qualifying drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrolled {
    /// Absolute distance travelled when the threshold was crossed.
    pub distance: f64,
}

#[derive(Debug, Clone)]
pub struct ScrollMonitor {
    threshold: f64,
    origin: f64,
    tracking: bool,
}

impl Default for ScrollMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollMonitor {
    pub fn new() -> Self {
        Self::with_threshold(SCROLL_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            origin: 0.0,
            tracking: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// A new drag gesture began at `offset`.
    pub fn drag_began(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.origin = offset;
        self.tracking = true;
    }

    /// The content offset changed. Returns the signal on the first update that
    /// crosses the threshold; later updates in the same drag are ignored.
    pub fn scrolled_to(&mut self, offset: f64) -> Option<Scrolled> {
        if !self.tracking || !offset.is_finite() {
            return None;
        }
        let distance = (offset - self.origin).abs();
        if distance > self.threshold {
            self.tracking = false;
            trace!(distance, "scroll threshold crossed");
            return Some(Scrolled { distance });
        }
        None
    }

    /// The finger lifted, whether or not the threshold was reached.
    pub fn drag_ended(&mut self) {
        self.tracking = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed relative deltas through one drag and count signals.
    fn signals_for(deltas: &[f64]) -> usize {
        let mut monitor = ScrollMonitor::new();
        let mut offset = 100.0;
        monitor.drag_began(offset);
        let mut count = 0;
        for delta in deltas {
            offset += delta;
            if monitor.scrolled_to(offset).is_some() {
                count += 1;
            }
        }
        monitor.drag_ended();
        count
    }

    #[test]
    fn one_signal_past_threshold() {
        assert_eq!(signals_for(&[5.0, 5.0, 5.0, 10.0]), 1);
    }

    #[test]
    fn no_signal_below_threshold() {
        assert_eq!(signals_for(&[5.0, 5.0, 5.0]), 0);
    }

    #[test]
    fn exactly_threshold_is_not_enough() {
        assert_eq!(signals_for(&[20.0]), 0);
    }

    #[test]
    fn debounced_within_drag() {
        assert_eq!(signals_for(&[25.0, 25.0, 25.0]), 1);
    }

    #[test]
    fn upward_drags_count() {
        assert_eq!(signals_for(&[-30.0]), 1);
    }

    #[test]
    fn updates_outside_a_drag_are_ignored() {
        let mut monitor = ScrollMonitor::new();
        assert!(monitor.scrolled_to(500.0).is_none());

        monitor.drag_began(0.0);
        monitor.drag_ended();
        assert!(monitor.scrolled_to(500.0).is_none());
    }

    #[test]
    fn each_drag_can_signal_once() {
        let mut monitor = ScrollMonitor::new();
        for _ in 0..3 {
            monitor.drag_began(0.0);
            assert!(monitor.scrolled_to(50.0).is_some());
            assert!(monitor.scrolled_to(90.0).is_none());
            monitor.drag_ended();
        }
    }

    #[test]
    fn non_finite_offsets_ignored() {
        let mut monitor = ScrollMonitor::new();
        monitor.drag_began(f64::NAN);
        assert!(!monitor.is_tracking());
        monitor.drag_began(0.0);
        assert!(monitor.scrolled_to(f64::INFINITY).is_none());
        assert!(monitor.is_tracking());
    }
}

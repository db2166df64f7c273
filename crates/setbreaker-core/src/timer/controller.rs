//! Timer controller.
//!
//! Wraps the pure [`RestTimer`] with everything that happens around a
//! transition: arming and cancelling the tick source, feedback pulses, the
//! content gate and the event queue. Every command returns the resulting
//! [`TimerSnapshot`] so a presentation layer never has to poke at internals.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::COUNTDOWN_PULSE_SECS;
use super::engine::{RestTimer, TimerPhase};
use super::scheduler::{TickScheduler, TICK_PERIOD};
use crate::events::Event;
use crate::feedback::{Feedback, Intensity};
use crate::gate::{AckChoice, ContentGate, ExpiryAlert, Overlay};
use crate::scroll::Scrolled;
use crate::storage::{Preferences, PreferencesObserver};

/// What a presentation layer needs to draw the timer bar and the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_secs: u32,
    pub rest_period_secs: u32,
    /// `mm:ss`
    pub display: String,
    /// Render in the alternate color.
    pub urgent: bool,
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<ExpiryAlert>,
}

pub struct TimerController<S: TickScheduler, F: Feedback> {
    engine: RestTimer,
    gate: ContentGate,
    prefs: Preferences,
    scheduler: S,
    feedback: F,
    events: Vec<Event>,
}

impl<S: TickScheduler, F: Feedback> TimerController<S, F> {
    /// Build an idle controller with the full rest period on the clock.
    /// Nothing starts until [`appear`](Self::appear) or a command.
    pub fn new(prefs: &Preferences, scheduler: S, feedback: F) -> Self {
        Self {
            engine: RestTimer::new(prefs.rest_period),
            gate: ContentGate::new(),
            prefs: prefs.clone(),
            scheduler,
            feedback,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.engine.phase()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.engine.remaining_secs()
    }

    pub fn is_blocked(&self) -> bool {
        self.gate.is_blocked()
    }

    pub fn gate(&self) -> &ContentGate {
        &self.gate
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.engine.phase(),
            remaining_secs: self.engine.remaining_secs(),
            rest_period_secs: self.engine.rest_period_secs(),
            display: self.engine.display(),
            urgent: self.engine.is_urgent(),
            blocked: self.gate.is_blocked(),
            overlay: self.gate.overlay(),
            alert: self.engine.is_expired().then(ExpiryAlert::default),
        }
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// The view appeared: fill the clock and honor auto-start.
    pub fn appear(&mut self) -> TimerSnapshot {
        self.engine.reset();
        self.sync_gate();
        if self.prefs.auto_start_timer {
            return self.start();
        }
        self.snapshot()
    }

    /// Start/pause toggle. Idle starts, Running pauses, Expired waits for
    /// [`acknowledge_expiry`](Self::acknowledge_expiry).
    pub fn start(&mut self) -> TimerSnapshot {
        match self.engine.phase() {
            TimerPhase::Running => return self.pause(),
            TimerPhase::Expired => {
                debug!("start ignored while expired");
                return self.snapshot();
            }
            TimerPhase::Idle => {}
        }
        self.feedback.pulse(Intensity::Medium);
        if let Some(event) = self.engine.start() {
            self.scheduler.arm(TICK_PERIOD);
            debug!(remaining = self.engine.remaining_secs(), "timer started");
            self.events.push(event);
        }
        self.snapshot()
    }

    pub fn pause(&mut self) -> TimerSnapshot {
        if let Some(event) = self.engine.pause() {
            self.feedback.pulse(Intensity::Medium);
            self.scheduler.cancel();
            debug!(remaining = self.engine.remaining_secs(), "timer paused");
            self.events.push(event);
        }
        self.snapshot()
    }

    /// Called by the tick source once per period.
    pub fn tick(&mut self) -> TimerSnapshot {
        match self.engine.tick() {
            Some(Event::TimerTicked { remaining_secs, at }) => {
                if remaining_secs <= COUNTDOWN_PULSE_SECS {
                    self.feedback.pulse(Intensity::Rigid);
                }
                self.events.push(Event::TimerTicked { remaining_secs, at });
            }
            Some(event @ Event::RestCompleted { .. }) => {
                self.feedback.pulse(Intensity::Rigid);
                self.scheduler.cancel();
                self.feedback.warning();
                info!(rest_period = self.engine.rest_period_secs(), "rest period complete");
                self.events.push(event);
                self.sync_gate();
            }
            Some(other) => self.events.push(other),
            None => {}
        }
        self.snapshot()
    }

    /// Back to a full clock. Restarts immediately when auto-start is on.
    pub fn reset(&mut self) -> TimerSnapshot {
        self.feedback.pulse(Intensity::Light);
        self.scheduler.cancel();
        let event = self.engine.reset();
        debug!(rest_period = self.engine.rest_period_secs(), "timer reset");
        self.events.push(event);
        self.sync_gate();
        if self.prefs.auto_start_timer {
            return self.start();
        }
        self.snapshot()
    }

    /// Answer the end-of-rest alert. Ignored unless the timer is expired.
    pub fn acknowledge_expiry(&mut self, choice: AckChoice) -> TimerSnapshot {
        if !self.engine.is_expired() {
            debug!(?choice, "acknowledgment ignored, timer not expired");
            return self.snapshot();
        }
        info!(choice = choice.label(), "expiry acknowledged");
        self.events.push(Event::ExpiryAcknowledged {
            choice,
            at: Utc::now(),
        });
        match choice {
            AckChoice::StartNextSet => self.reset(),
            AckChoice::ExtendRest => {
                self.feedback.pulse(Intensity::Medium);
                let event = self.engine.extend();
                self.scheduler.arm(TICK_PERIOD);
                self.events.push(event);
                self.sync_gate();
                self.snapshot()
            }
        }
    }

    /// A drag crossed the scroll threshold. Starts a fresh countdown when
    /// start-on-scroll is on and nothing is running or blocking.
    pub fn on_scrolled(&mut self, signal: Scrolled) -> TimerSnapshot {
        let should_start = self.prefs.start_on_scroll
            && !self.engine.is_running()
            && !self.gate.is_blocked();
        debug!(distance = signal.distance, should_start, "feed scrolled");
        self.events.push(Event::FeedScrolled {
            started_timer: should_start,
            at: Utc::now(),
        });
        if !should_start {
            return self.snapshot();
        }
        self.engine.reset();
        self.feedback.pulse(Intensity::Soft);
        self.start()
    }

    /// Re-read preferences. A shorter rest period clips the clock right away.
    pub fn apply_preferences(&mut self, prefs: &Preferences) {
        self.engine.set_rest_period(prefs.rest_period);
        self.prefs = prefs.clone();
        self.events.push(Event::PreferencesApplied {
            rest_period_secs: prefs.rest_period,
            auto_start_timer: prefs.auto_start_timer,
            start_on_scroll: prefs.start_on_scroll,
            at: Utc::now(),
        });
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn sync_gate(&mut self) {
        if let Some(blocked) = self.gate.sync(self.engine.phase()) {
            self.events.push(Event::GateChanged {
                blocked,
                at: Utc::now(),
            });
        }
    }
}

impl<S: TickScheduler, F: Feedback> PreferencesObserver for TimerController<S, F> {
    fn preferences_changed(&mut self, prefs: &Preferences) {
        self.apply_preferences(prefs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{FeedbackCall, RecordingFeedback};
    use crate::timer::ManualScheduler;

    fn prefs(rest_period: u32, auto_start_timer: bool, start_on_scroll: bool) -> Preferences {
        Preferences {
            rest_period,
            auto_start_timer,
            start_on_scroll,
            ..Preferences::default()
        }
    }

    fn controller(p: &Preferences) -> TimerController<ManualScheduler, RecordingFeedback> {
        TimerController::new(p, ManualScheduler::new(), RecordingFeedback::new())
    }

    /// Deliver `n` ticks, but only while the scheduler would actually fire.
    fn run_ticks<F: Feedback>(c: &mut TimerController<ManualScheduler, F>, n: u32) {
        for _ in 0..n {
            if c.scheduler().is_armed() {
                c.tick();
            }
        }
    }

    #[test]
    fn appear_auto_starts() {
        let mut c = controller(&prefs(60, true, false));
        let snap = c.appear();
        assert_eq!(snap.phase, TimerPhase::Running);
        assert_eq!(snap.display, "01:00");
        assert!(c.scheduler().is_armed());
    }

    #[test]
    fn appear_without_auto_start_stays_idle() {
        let mut c = controller(&prefs(60, false, false));
        assert_eq!(c.appear().phase, TimerPhase::Idle);
        assert!(!c.scheduler().is_armed());
    }

    #[test]
    fn start_toggles_without_double_scheduling() {
        let mut c = controller(&prefs(30, false, false));
        c.start();
        assert_eq!(c.phase(), TimerPhase::Running);
        c.start();
        assert_eq!(c.phase(), TimerPhase::Idle);
        assert!(!c.scheduler().is_armed());
        c.start();
        assert_eq!(c.scheduler().arm_count(), 2);
        assert_eq!(c.scheduler().cancel_count(), 1);
    }

    #[test]
    fn pause_and_resume_do_not_drift() {
        let mut c = controller(&prefs(30, false, false));
        c.start();
        run_ticks(&mut c, 5);
        assert_eq!(c.remaining_secs(), 25);
        c.pause();
        run_ticks(&mut c, 5);
        assert_eq!(c.remaining_secs(), 25);
        c.start();
        run_ticks(&mut c, 5);
        assert_eq!(c.remaining_secs(), 20);
    }

    #[test]
    fn expiry_blocks_warns_and_stops_ticking() {
        let mut c = controller(&prefs(15, false, false));
        c.start();
        run_ticks(&mut c, 14);
        assert!(!c.is_blocked());
        let snap = c.tick();
        assert_eq!(snap.phase, TimerPhase::Expired);
        assert!(snap.blocked);
        assert!(snap.overlay.is_some());
        assert!(snap.alert.is_some());
        assert!(!c.scheduler().is_armed());
        assert_eq!(c.feedback().count(FeedbackCall::Warning), 1);

        c.tick();
        assert_eq!(c.remaining_secs(), 0);
        assert_eq!(c.feedback().count(FeedbackCall::Warning), 1);
    }

    #[test]
    fn last_ten_seconds_pulse() {
        let mut c = controller(&prefs(15, false, false));
        c.start();
        run_ticks(&mut c, 15);
        // Ticks land on 14..=0; the eleven at or below ten pulse, then the warning.
        assert_eq!(c.feedback().count(FeedbackCall::Pulse(Intensity::Rigid)), 11);
        assert_eq!(c.feedback().calls().last(), Some(&FeedbackCall::Warning));
    }

    #[test]
    fn start_is_ignored_while_expired() {
        let mut c = controller(&prefs(15, false, false));
        c.start();
        run_ticks(&mut c, 15);
        let snap = c.start();
        assert_eq!(snap.phase, TimerPhase::Expired);
        assert!(!c.scheduler().is_armed());
    }

    #[test]
    fn start_next_set_unblocks_and_resets() {
        let mut c = controller(&prefs(15, true, false));
        c.appear();
        run_ticks(&mut c, 15);
        assert!(c.is_blocked());

        let snap = c.acknowledge_expiry(AckChoice::StartNextSet);
        assert!(!snap.blocked);
        assert_eq!(snap.remaining_secs, 15);
        assert_eq!(snap.phase, TimerPhase::Running);
    }

    #[test]
    fn extend_rest_refills_and_runs() {
        let mut c = controller(&prefs(15, false, false));
        c.start();
        run_ticks(&mut c, 15);

        let snap = c.acknowledge_expiry(AckChoice::ExtendRest);
        assert_eq!(snap.phase, TimerPhase::Running);
        assert_eq!(snap.remaining_secs, 15);
        assert!(!snap.blocked);
        assert!(c.scheduler().is_armed());
    }

    #[test]
    fn acknowledge_outside_expiry_is_ignored() {
        let mut c = controller(&prefs(30, false, false));
        c.start();
        let before = c.snapshot();
        assert_eq!(c.acknowledge_expiry(AckChoice::ExtendRest), before);
    }

    #[test]
    fn reset_is_idempotent() {
        for auto in [true, false] {
            let mut c = controller(&prefs(45, auto, false));
            c.start();
            run_ticks(&mut c, 7);
            let once = c.reset();
            let twice = c.reset();
            assert_eq!(once, twice);
            assert_eq!(twice.remaining_secs, 45);
        }
    }

    #[test]
    fn scroll_starts_only_when_enabled_and_idle() {
        let signal = Scrolled { distance: 25.0 };

        let mut off = controller(&prefs(60, false, false));
        assert_eq!(off.on_scrolled(signal).phase, TimerPhase::Idle);

        let mut on = controller(&prefs(60, false, true));
        on.start();
        run_ticks(&mut on, 10);
        on.pause();
        let snap = on.on_scrolled(signal);
        assert_eq!(snap.phase, TimerPhase::Running);
        assert_eq!(snap.remaining_secs, 60);
        assert_eq!(on.feedback().count(FeedbackCall::Pulse(Intensity::Soft)), 1);

        run_ticks(&mut on, 3);
        assert_eq!(on.on_scrolled(signal).remaining_secs, 57);
    }

    #[test]
    fn scroll_does_not_start_while_blocked() {
        let mut c = controller(&prefs(15, false, true));
        c.start();
        run_ticks(&mut c, 15);
        let snap = c.on_scrolled(Scrolled { distance: 40.0 });
        assert_eq!(snap.phase, TimerPhase::Expired);
        assert!(snap.blocked);
    }

    #[test]
    fn shorter_rest_period_clips_clock() {
        let mut c = controller(&prefs(120, false, false));
        c.preferences_changed(&prefs(30, false, false));
        assert_eq!(c.remaining_secs(), 30);
        assert_eq!(c.reset().remaining_secs, 30);
    }

    #[test]
    fn gate_changes_are_reported_once() {
        let mut c = controller(&prefs(15, false, false));
        c.start();
        run_ticks(&mut c, 20);
        c.acknowledge_expiry(AckChoice::StartNextSet);
        let gate_events: Vec<bool> = c
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                Event::GateChanged { blocked, .. } => Some(blocked),
                _ => None,
            })
            .collect();
        assert_eq!(gate_events, [true, false]);
        assert!(c.drain_events().is_empty());
    }
}

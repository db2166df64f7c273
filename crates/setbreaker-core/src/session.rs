//! Feed session.
//!
//! Glue between one viewport, one scroll monitor and one timer controller:
//! loads the selected platform, routes drag gestures, and keeps the
//! viewport's interactivity and overlay in step with the content gate.

use chrono::Utc;
use tracing::{debug, info};

use crate::events::Event;
use crate::feedback::{Feedback, Intensity};
use crate::gate::AckChoice;
use crate::scroll::ScrollMonitor;
use crate::storage::{Platform, Preferences, PreferencesObserver};
use crate::timer::{TickScheduler, TimerController, TimerSnapshot};
use crate::viewport::{Viewport, ViewportEvent};

pub struct FeedSession<V: Viewport, S: TickScheduler, F: Feedback> {
    viewport: V,
    monitor: ScrollMonitor,
    timer: TimerController<S, F>,
    platform: Platform,
    rendered_blocked: bool,
    events: Vec<Event>,
}

impl<V: Viewport, S: TickScheduler, F: Feedback> FeedSession<V, S, F> {
    pub fn new(prefs: &Preferences, viewport: V, scheduler: S, feedback: F) -> Self {
        Self {
            viewport,
            monitor: ScrollMonitor::new(),
            timer: TimerController::new(prefs, scheduler, feedback),
            platform: prefs.platform,
            rendered_blocked: false,
            events: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn timer(&self) -> &TimerController<S, F> {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut TimerController<S, F> {
        &mut self.timer
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Load the feed and run the timer's on-appear rule.
    pub fn appear(&mut self) -> TimerSnapshot {
        self.load_feed();
        let snap = self.timer.appear();
        self.render_gate();
        snap
    }

    pub fn start(&mut self) -> TimerSnapshot {
        self.command(|t| t.start())
    }

    pub fn pause(&mut self) -> TimerSnapshot {
        self.command(|t| t.pause())
    }

    pub fn reset(&mut self) -> TimerSnapshot {
        self.command(|t| t.reset())
    }

    pub fn tick(&mut self) -> TimerSnapshot {
        self.command(|t| t.tick())
    }

    pub fn acknowledge_expiry(&mut self, choice: AckChoice) -> TimerSnapshot {
        self.command(|t| t.acknowledge_expiry(choice))
    }

    /// Route a drag callback. Returns a snapshot when the gesture changed
    /// timer state. Drags on a blocked feed are dropped, except the end of one.
    pub fn handle_viewport(&mut self, event: ViewportEvent) -> Option<TimerSnapshot> {
        if self.timer.is_blocked() && event != ViewportEvent::DragEnded {
            return None;
        }
        match event {
            ViewportEvent::DragBegan { offset } => {
                self.monitor.drag_began(offset);
                None
            }
            ViewportEvent::Scrolled { offset } => {
                let signal = self.monitor.scrolled_to(offset)?;
                Some(self.command(|t| t.on_scrolled(signal)))
            }
            ViewportEvent::DragEnded => {
                self.monitor.drag_ended();
                None
            }
        }
    }

    /// Session events followed by timer events, oldest first within each.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(self.timer.drain_events());
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn command(
        &mut self,
        f: impl FnOnce(&mut TimerController<S, F>) -> TimerSnapshot,
    ) -> TimerSnapshot {
        let snap = f(&mut self.timer);
        self.render_gate();
        snap
    }

    fn render_gate(&mut self) {
        let blocked = self.timer.is_blocked();
        if blocked == self.rendered_blocked {
            return;
        }
        self.rendered_blocked = blocked;
        self.viewport.set_interactive(self.timer.gate().is_interactive());
        self.viewport.show_overlay(self.timer.gate().overlay().as_ref());
        if blocked {
            self.monitor.drag_ended();
        }
    }

    fn load_feed(&mut self) {
        let url = self.platform.url();
        info!(platform = %self.platform, url, "loading feed");
        self.viewport.load(url);
        self.events.push(Event::FeedLoaded {
            platform: self.platform,
            url: url.to_string(),
            at: Utc::now(),
        });
    }
}

impl<V: Viewport, S: TickScheduler, F: Feedback> PreferencesObserver for FeedSession<V, S, F> {
    fn preferences_changed(&mut self, prefs: &Preferences) {
        if self.timer.preferences() != prefs {
            self.timer.feedback_mut().pulse(Intensity::Light);
        }
        self.timer.apply_preferences(prefs);
        if prefs.platform != self.platform {
            debug!(from = %self.platform, to = %prefs.platform, "platform switched");
            self.platform = prefs.platform;
            self.monitor.drag_ended();
            self.load_feed();
        }
        self.render_gate();
    }
}

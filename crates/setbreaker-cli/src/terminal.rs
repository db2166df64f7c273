//! Terminal stand-ins for the host collaborators: a tokio interval as the tick
//! source, log lines as haptics, and stdout as the feed viewport.

use std::time::Duration;

use setbreaker_core::{
    Feedback, Intensity, Overlay, TickScheduler, TimerPhase, TimerSnapshot, Viewport,
};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Tick source backed by a `tokio::time::Interval`.
///
/// Must be armed from inside a runtime with the time driver enabled.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    interval: Option<Interval>,
}

impl IntervalScheduler {
    /// Resolves on the next tick. Never resolves while disarmed, so it can sit
    /// in a `select!` unconditionally.
    pub async fn wait(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl TickScheduler for IntervalScheduler {
    fn arm(&mut self, period: Duration) {
        if self.interval.is_some() {
            return;
        }
        // First tick one full period from now, not immediately.
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn cancel(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }
}

/// Haptics as log lines; the expiry warning also rings the terminal bell.
#[derive(Debug, Default)]
pub struct TerminalFeedback {
    bell: bool,
}

impl TerminalFeedback {
    pub fn with_bell(bell: bool) -> Self {
        Self { bell }
    }
}

impl Feedback for TerminalFeedback {
    fn pulse(&mut self, intensity: Intensity) {
        debug!(?intensity, "pulse");
    }

    fn warning(&mut self) {
        debug!("warning notification");
        if self.bell {
            eprint!("\x07");
        }
    }
}

/// Prints what a real feed view would show.
#[derive(Debug, Default)]
pub struct TerminalViewport {
    url: Option<String>,
}

impl TerminalViewport {
    pub fn current_url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl Viewport for TerminalViewport {
    fn load(&mut self, url: &str) {
        info!(url, "feed loaded");
        self.url = Some(url.to_string());
        println!("feed: {url}");
    }

    fn set_interactive(&mut self, interactive: bool) {
        debug!(interactive, "viewport interactivity");
    }

    fn show_overlay(&mut self, overlay: Option<&Overlay>) {
        if let Some(overlay) = overlay {
            println!("==== {} ====", overlay.message);
        }
    }
}

/// One-line rendering of the timer bar.
pub fn status_line(snap: &TimerSnapshot) -> String {
    let phase = match snap.phase {
        TimerPhase::Idle => "idle",
        TimerPhase::Running => "running",
        TimerPhase::Expired => "expired",
    };
    let urgent = if snap.urgent { " !" } else { "" };
    format!("[{phase:>7}] {}{urgent}", snap.display)
}

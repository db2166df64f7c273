use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gate::{AckChoice, ExpiryAlert};
use crate::storage::Platform;

/// Every state change in the system produces an Event.
/// Drivers drain them from the controller after each command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerTicked {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Countdown hit zero; the feed is now blocked until acknowledged.
    RestCompleted {
        alert: ExpiryAlert,
        at: DateTime<Utc>,
    },
    TimerReset {
        rest_period_secs: u32,
        at: DateTime<Utc>,
    },
    ExpiryAcknowledged {
        choice: AckChoice,
        at: DateTime<Utc>,
    },
    /// A drag gesture crossed the scroll threshold.
    FeedScrolled {
        started_timer: bool,
        at: DateTime<Utc>,
    },
    GateChanged {
        blocked: bool,
        at: DateTime<Utc>,
    },
    PreferencesApplied {
        rest_period_secs: u32,
        auto_start_timer: bool,
        start_on_scroll: bool,
        at: DateTime<Utc>,
    },
    FeedLoaded {
        platform: Platform,
        url: String,
        at: DateTime<Utc>,
    },
}

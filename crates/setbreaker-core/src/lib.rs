//! # SetBreaker Core Library
//!
//! Rest-period timing for people who scroll a feed between exercise sets.
//! A countdown runs while the feed is open; when it runs out the feed is
//! blocked until the user either starts the next set or extends the rest.
//!
//! ## Architecture
//!
//! - **Timer**: a pure countdown state machine ([`RestTimer`]) wrapped by a
//!   [`TimerController`] that owns an injected tick source and feedback device
//! - **Scroll monitor**: turns drag callbacks into one debounced signal per drag
//! - **Content gate**: blocking state derived from timer expiry
//! - **Storage**: TOML-backed [`Preferences`] with explicit change observers
//! - **Session**: [`FeedSession`] wires a viewport to all of the above
//!
//! Everything runs on one thread. Hosts deliver ticks and gestures in order
//! and read back [`TimerSnapshot`]s and [`Event`]s.

pub mod error;
pub mod events;
pub mod feedback;
pub mod gate;
pub mod scroll;
pub mod session;
pub mod storage;
pub mod timer;
pub mod viewport;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use feedback::{Feedback, FeedbackCall, Intensity, NoFeedback, RecordingFeedback};
pub use gate::{AckChoice, ContentGate, ExpiryAlert, Overlay};
pub use scroll::{ScrollMonitor, Scrolled, SCROLL_THRESHOLD};
pub use session::FeedSession;
pub use storage::{Platform, Preferences, PreferencesObserver, PreferencesStore};
pub use timer::{
    format_clock, ManualScheduler, RestTimer, TickScheduler, TimerController, TimerPhase,
    TimerSnapshot, TICK_PERIOD,
};
pub use viewport::{RecordingViewport, Viewport, ViewportEvent};

mod clock;
mod controller;
mod engine;
mod scheduler;

pub use clock::{format_clock, COUNTDOWN_PULSE_SECS, URGENT_BELOW_SECS};
pub use controller::{TimerController, TimerSnapshot};
pub use engine::{RestTimer, TimerPhase};
pub use scheduler::{ManualScheduler, TickScheduler, TICK_PERIOD};

/// Remaining times strictly below this are rendered in the alert color.
pub const URGENT_BELOW_SECS: u32 = 10;

/// Once remaining time is at or below this, every tick pulses.
pub const COUNTDOWN_PULSE_SECS: u32 = 10;

/// Zero-padded `mm:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

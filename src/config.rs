//! Application-level configuration constants.

// Timing
pub const TICK_MS: u32 = 100;

// Button labels
pub const LABEL_START: &str = "Start";
pub const LABEL_STOP: &str = "Stop";
pub const LABEL_LAP: &str = "Lap";
pub const LABEL_RESET: &str = "Reset";
pub const LAP_PREFIX: &str = "Lap";

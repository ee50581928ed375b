//! Configuration constants for the buzzer client
//!
//! This module contains the timing defaults and the bounds used to
//! validate client configuration.

/// Countdown configuration constants
pub mod countdown {
    /// Default period between two local ticks, in milliseconds
    ///
    /// The amount removed from the remaining time on every tick is the
    /// same as the period.
    pub const TICK_MILLIS: u64 = 100;
    /// Smallest tick period accepted by the configuration, in milliseconds
    pub const MIN_TICK_MILLIS: u64 = 10;
    /// Largest tick period accepted by the configuration, in milliseconds
    pub const MAX_TICK_MILLIS: u64 = 1000;
}

/// Keyboard shortcuts offered to moderators
pub mod shortcuts {
    /// Resets the session
    pub const RESET_SESSION: char = 'r';
    /// Clears every lock-out
    pub const RESET_BLACKLIST: char = 'c';
    /// Pauses a running round, resumes otherwise
    pub const TOGGLE_ROUND: char = ' ';
}

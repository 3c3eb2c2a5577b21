//! Errors

use thiserror::Error;

/// Invalid transmitter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("clock frequency must be non-zero")]
    ZeroClock,
    #[error("baud rate must be non-zero")]
    ZeroBaudRate,
    #[error("oversampling factor must be non-zero")]
    ZeroOversampling,
    /// `clock_hz < baud_rate * oversampling`, the divider would never pulse.
    #[error("clock of {clock_hz} Hz is too slow for {baud_rate} baud at {oversampling}x oversampling")]
    ClockTooSlow { clock_hz: u32, baud_rate: u32, oversampling: u32 },
    #[error("divider limit must be non-zero")]
    ZeroLimit,
    #[error("data width of {0} bits is outside 5..=8")]
    DataWidth(u8),
}

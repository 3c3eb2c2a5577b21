//! Transmitter configuration
//!
//! The generics of the hardware description (clock frequency, baud rate,
//! oversampling factor, data width) are fixed when a component is built, so
//! they live here and are validated once.

use crate::error::ConfigError;
use crate::utils::Fraction;
use static_assertions::const_assert;
use std::time::Duration;

pub const DEFAULT_CLOCK_HZ: u32 = 50_000_000;
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_OVERSAMPLING: u32 = 16;
pub const DEFAULT_DATA_WIDTH: u8 = 8;

// the default divider must pulse at all
const_assert!(DEFAULT_CLOCK_HZ / (DEFAULT_BAUD_RATE * DEFAULT_OVERSAMPLING) >= 1);
const_assert!(DEFAULT_DATA_WIDTH >= 5 && DEFAULT_DATA_WIDTH <= 8);

/// Number of stop bits, 1 or 2.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    #[default]
    One,
    Two,
}
impl StopBits {
    pub fn count(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Transmitter parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TxConfig {
    /// System clock driving the step source
    pub clock_hz: u32,
    /// Requested line rate
    pub baud_rate: u32,
    /// Divider pulses per bit period
    pub oversampling: u32,
    /// Data bits per frame (5 to 8)
    pub data_width: u8,
    pub stop_bits: StopBits,
}
impl TxConfig {
    pub fn new(clock_hz: u32, baud_rate: u32, oversampling: u32) -> Self {
        Self { clock_hz, baud_rate, oversampling, ..Default::default() }
    }
    pub fn with_data_width(mut self, data_width: u8) -> Self {
        self.data_width = data_width;
        self
    }
    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }
    /// Check every parameter, cheapest first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if self.oversampling == 0 {
            return Err(ConfigError::ZeroOversampling);
        }
        if !(5..=8).contains(&self.data_width) {
            return Err(ConfigError::DataWidth(self.data_width));
        }
        if self.ticks_per_clock().trunc() == 0 {
            return Err(ConfigError::ClockTooSlow { clock_hz: self.clock_hz, baud_rate: self.baud_rate, oversampling: self.oversampling });
        }
        Ok(())
    }
    /// Clock steps per divider pulse: `clock_hz / (baud_rate * oversampling)`, truncated.
    pub fn divider_limit(&self) -> Result<u32, ConfigError> {
        self.validate()?;
        // bounded by clock_hz so it fits
        Ok(self.ticks_per_clock().trunc() as u32)
    }
    /// Baud rate actually produced by the truncated divider.
    pub fn achieved_baud_rate(&self) -> Result<Fraction, ConfigError> {
        let limit = u64::from(self.divider_limit()?);
        Ok(Fraction(u64::from(self.clock_hz), 1) / (limit * u64::from(self.oversampling)))
    }
    /// Bits per frame: start, data and stop bits.
    pub fn frame_bits(&self) -> u32 {
        1 + u32::from(self.data_width) + self.stop_bits.count()
    }
    /// Divider pulses per frame.
    pub fn frame_ticks(&self) -> u32 {
        self.frame_bits() * self.oversampling
    }
    /// Wall-clock time of one frame at the achieved baud rate.
    pub fn frame_duration(&self) -> Result<Duration, ConfigError> {
        let baud = self.achieved_baud_rate()?;
        Ok((baud.invert() * u64::from(self.frame_bits())).into())
    }
    fn ticks_per_clock(&self) -> Fraction {
        Fraction(u64::from(self.clock_hz), 1) / (u64::from(self.baud_rate) * u64::from(self.oversampling))
    }
}
impl Default for TxConfig {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            baud_rate: DEFAULT_BAUD_RATE,
            oversampling: DEFAULT_OVERSAMPLING,
            data_width: DEFAULT_DATA_WIDTH,
            stop_bits: StopBits::One,
        }
    }
}

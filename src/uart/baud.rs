//! Baud generator
//!
//! Gated clock divider producing `oversampling` pulses per bit period.

use crate::config::TxConfig;
use crate::error::ConfigError;
use crate::utils::Fraction;

/// Gated divider.
///
/// The counter only runs while enabled and is forced to zero otherwise, so
/// the first period after an enable is always a full `limit` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickDivider {
    limit: u32,
    counter: u32,
}
impl TickDivider {
    /// Divider pulsing once every `limit` enabled steps.
    pub fn new(limit: u32) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(Self { limit, counter: 0 })
    }
    /// Divider for `clock_hz / (baud_rate * oversampling)`.
    pub fn from_config(config: &TxConfig) -> Result<Self, ConfigError> {
        let limit = config.divider_limit()?;
        let achieved = config.achieved_baud_rate()?;
        if achieved != Fraction(u64::from(config.baud_rate), 1) {
            let error = (achieved.into_f64() / f64::from(config.baud_rate) - 1.0) * 100.0;
            log::warn!("baud rate {} is not reachable from {} Hz, using {:.2} ({:+.2}%)", config.baud_rate, config.clock_hz, achieved.into_f64(), error);
        }
        Self::new(limit)
    }
    pub fn limit(&self) -> u32 {
        self.limit
    }
    pub fn counter(&self) -> u32 {
        self.counter
    }
    /// One clock step. Returns the pulse.
    pub fn advance(&mut self, enabled: bool) -> bool {
        if !enabled {
            self.counter = 0;
            false
        } else if self.counter == self.limit - 1 {
            self.counter = 0;
            true
        } else {
            self.counter += 1;
            false
        }
    }
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_period() {
        let mut divider = TickDivider::new(4).unwrap();
        let pulses: Vec<bool> = (0..12).map(|_| divider.advance(true)).collect();
        assert_eq!(vec![false, false, false, true, false, false, false, true, false, false, false, true], pulses);
    }

    #[test]
    fn test_limit_one() {
        let mut divider = TickDivider::new(1).unwrap();
        assert!((0..5).all(|_| divider.advance(true)));
        assert!(!divider.advance(false));
    }

    #[test]
    fn test_disabled() {
        let mut divider = TickDivider::new(3).unwrap();
        assert!((0..10).all(|_| !divider.advance(false)));
        assert_eq!(0, divider.counter());
    }

    #[test]
    fn test_rearm() {
        // disabling at any phase and re-enabling gives a full period before the first pulse
        let limit = 7;
        for phase in 0..limit {
            let mut divider = TickDivider::new(limit).unwrap();
            for _ in 0..phase {
                divider.advance(true);
            }
            assert_eq!(phase, divider.counter());
            assert!(!divider.advance(false));
            assert_eq!(0, divider.counter());
            for _ in 1..limit {
                assert!(!divider.advance(true), "phase={}", phase);
            }
            assert!(divider.advance(true), "phase={}", phase);
        }
    }

    #[test]
    fn test_reset() {
        let mut divider = TickDivider::new(5).unwrap();
        divider.advance(true);
        divider.advance(true);
        divider.reset();
        assert_eq!(0, divider.counter());
        assert!((1..5).all(|_| !divider.advance(true)));
        assert!(divider.advance(true));
    }

    #[test]
    fn test_from_config() {
        let divider = TickDivider::from_config(&TxConfig::new(3_686_400, 9600, 16)).unwrap();
        assert_eq!(24, divider.limit());
        let divider = TickDivider::from_config(&TxConfig::default()).unwrap();
        assert_eq!(27, divider.limit());
        assert_eq!(Err(ConfigError::ZeroBaudRate), TickDivider::from_config(&TxConfig::new(1_000_000, 0, 16)));
        assert_eq!(Err(ConfigError::ZeroLimit), TickDivider::new(0));
    }
}

//! Baud generator and transmitter wired together.

use crate::config::TxConfig;
use crate::error::ConfigError;
use crate::uart::baud::TickDivider;
use crate::uart::transmitter::SerialTransmitter;
use crate::uart::transmitter::TxInput;

/// Outputs after a clock step.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TxOutput {
    /// Serial line
    pub line: bool,
    /// One-step pulse at the end of a frame
    pub done: bool,
    /// A frame is in flight, start strobes are ignored
    pub busy: bool,
    /// Divider pulse consumed by this step
    pub tick: bool,
}

/// Byte in, serial line out.
///
/// The transmitter's registered enable gates the divider and the divider's
/// pulse clocks the transmitter. Both advance on the same step from the
/// values of the previous one.
#[derive(Debug, Clone)]
pub struct TransmitSubsystem {
    config: TxConfig,
    divider: TickDivider,
    transmitter: SerialTransmitter,
}
impl TransmitSubsystem {
    pub fn new(config: &TxConfig) -> Result<Self, ConfigError> {
        Ok(Self { config: *config, divider: TickDivider::from_config(config)?, transmitter: SerialTransmitter::new(config)? })
    }
    pub fn config(&self) -> &TxConfig {
        &self.config
    }
    pub fn divider(&self) -> &TickDivider {
        &self.divider
    }
    pub fn transmitter(&self) -> &SerialTransmitter {
        &self.transmitter
    }
    pub fn line(&self) -> bool {
        self.transmitter.line()
    }
    pub fn done(&self) -> bool {
        self.transmitter.done()
    }
    pub fn is_busy(&self) -> bool {
        self.transmitter.is_busy()
    }
    /// One clock step, optionally strobing start with a byte.
    pub fn step(&mut self, start: Option<u8>) -> TxOutput {
        let tick = self.divider.advance(self.transmitter.enable_request());
        self.transmitter.step(TxInput { start: start.is_some(), data: start.unwrap_or(0), tick });
        TxOutput { line: self.line(), done: self.done(), busy: self.is_busy(), tick }
    }
    /// Step with a start strobe. Ignored while busy.
    pub fn start(&mut self, byte: u8) -> TxOutput {
        self.step(Some(byte))
    }
    /// Step without a start strobe.
    pub fn tick(&mut self) -> TxOutput {
        self.step(None)
    }
    pub fn reset(&mut self) {
        self.divider.reset();
        self.transmitter.reset();
    }
}

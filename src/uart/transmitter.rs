//! Transmitter finite-state machine
//!
//! Moore machine: every output is a register, updated once per clock step
//! from the next-state function. Nothing is read-modified-written in place.
//!
//! Frame on the line: start bit (0), data bits LSB first, stop bit(s) (1).
//! Each bit is held for `oversampling` divider pulses.

use crate::config::StopBits;
use crate::config::TxConfig;
use crate::error::ConfigError;

/// Where the transmitter is in the frame.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    StartBit,
    DataBits,
    StopBit,
}

/// Inputs sampled at a clock step.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TxInput {
    /// Start strobe, ignored unless idle
    pub start: bool,
    /// Byte latched with the start strobe
    pub data: u8,
    /// Divider pulse
    pub tick: bool,
}

/// Register file of the transmitter (the `_reg` half of each `_next`/`_reg` pair).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TxRegs {
    pub phase: Phase,
    /// Remaining data bits, the next one in bit 0
    pub shift: u8,
    /// Pulses seen in the current bit period
    pub tick_count: u32,
    /// Data bits sent
    pub bit_count: u8,
    /// Serial line
    pub line: bool,
    /// Frame finished on the previous step
    pub done: bool,
    /// Divider enable, one step behind the phase
    pub enable: bool,
}
impl Default for TxRegs {
    fn default() -> Self {
        Self { phase: Phase::Idle, shift: 0, tick_count: 0, bit_count: 0, line: true, done: false, enable: false }
    }
}

/// UART transmitter.
#[derive(Debug, Clone)]
pub struct SerialTransmitter {
    oversampling: u32,
    data_width: u8,
    stop_bits: StopBits,
    q: TxRegs,
}
impl SerialTransmitter {
    pub fn new(config: &TxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { oversampling: config.oversampling, data_width: config.data_width, stop_bits: config.stop_bits, q: TxRegs::default() })
    }
    pub fn regs(&self) -> &TxRegs {
        &self.q
    }
    pub fn phase(&self) -> Phase {
        self.q.phase
    }
    pub fn line(&self) -> bool {
        self.q.line
    }
    pub fn done(&self) -> bool {
        self.q.done
    }
    pub fn enable_request(&self) -> bool {
        self.q.enable
    }
    pub fn is_busy(&self) -> bool {
        self.q.phase != Phase::Idle
    }
    /// Next-state function. Pure, `q` is not touched.
    pub fn next(&self, q: &TxRegs, input: TxInput) -> TxRegs {
        // registered enable: reflects the phase of this step, visible on the next
        let mut d = TxRegs { done: false, enable: q.phase != Phase::Idle, ..*q };
        let last_tick = self.oversampling - 1;

        match q.phase {
            Phase::Idle => {
                if input.start {
                    d.phase = Phase::StartBit;
                    d.shift = input.data & self.data_mask();
                    d.tick_count = 0;
                    d.bit_count = 0;
                }
            }
            Phase::StartBit => {
                if input.tick {
                    if q.tick_count == last_tick {
                        d.phase = Phase::DataBits;
                        d.tick_count = 0;
                        d.bit_count = 0;
                    } else {
                        d.tick_count = q.tick_count + 1;
                    }
                }
            }
            Phase::DataBits => {
                if input.tick {
                    if q.tick_count == last_tick {
                        d.tick_count = 0;
                        d.shift = q.shift >> 1;
                        if q.bit_count == self.data_width - 1 {
                            d.phase = Phase::StopBit;
                            d.bit_count = 0;
                        } else {
                            d.bit_count = q.bit_count + 1;
                        }
                    } else {
                        d.tick_count = q.tick_count + 1;
                    }
                }
            }
            Phase::StopBit => {
                if input.tick {
                    if q.tick_count == self.oversampling * self.stop_bits.count() - 1 {
                        d.phase = Phase::Idle;
                        d.tick_count = 0;
                        d.done = true;
                    } else {
                        d.tick_count = q.tick_count + 1;
                    }
                }
            }
        }

        d.line = match d.phase {
            Phase::Idle | Phase::StopBit => true,
            Phase::StartBit => false,
            Phase::DataBits => d.shift & 1 != 0,
        };
        d
    }
    /// Clock edge: commit the next state.
    pub fn step(&mut self, input: TxInput) {
        let d = self.next(&self.q, input);
        if d.phase != self.q.phase {
            log::trace!("tx {:?} -> {:?}", self.q.phase, d.phase);
            if self.q.phase == Phase::Idle {
                log::debug!("tx start 0x{:02x}", d.shift);
            }
        } else if input.start && self.q.phase != Phase::Idle {
            log::trace!("tx busy, start of 0x{:02x} ignored", input.data);
        }
        if d.done {
            log::debug!("tx done");
        }
        self.q = d;
    }
    /// Abandon any frame in flight.
    pub fn reset(&mut self) {
        if self.is_busy() {
            log::debug!("tx reset in {:?}", self.q.phase);
        }
        self.q = TxRegs::default();
    }
    fn data_mask(&self) -> u8 {
        (0xffu16 >> (8 - self.data_width)) as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TICK: TxInput = TxInput { start: false, data: 0, tick: true };
    const WAIT: TxInput = TxInput { start: false, data: 0, tick: false };

    fn start(data: u8) -> TxInput {
        TxInput { start: true, data, tick: false }
    }

    fn transmitter(oversampling: u32) -> SerialTransmitter {
        SerialTransmitter::new(&TxConfig::new(1_000_000, 1000, oversampling)).unwrap()
    }

    /// Line level seen at each pulse until done.
    fn frame(tx: &mut SerialTransmitter, data: u8) -> Vec<bool> {
        tx.step(start(data));
        let mut levels = Vec::new();
        while !tx.done() {
            levels.push(tx.line());
            tx.step(TICK);
            assert!(levels.len() <= 1000, "frame never ends");
        }
        levels
    }

    #[test]
    fn test_idle() {
        let mut tx = transmitter(16);
        for _ in 0..100 {
            tx.step(TICK);
            tx.step(WAIT);
        }
        assert_eq!(Phase::Idle, tx.phase());
        assert!(tx.line());
        assert!(!tx.done());
        assert!(!tx.enable_request());
    }

    #[test]
    fn test_frame_0x41() {
        let mut tx = transmitter(16);
        let levels = frame(&mut tx, 0x41);
        assert_eq!(160, levels.len());
        let mut expected = Vec::new();
        for bit in [false, true, false, false, false, false, false, true, false, true] {
            expected.extend(std::iter::repeat(bit).take(16));
        }
        assert_eq!(expected, levels);
        assert_eq!(Phase::Idle, tx.phase());
        assert!(tx.line());
        tx.step(WAIT);
        assert!(!tx.done(), "done lasts one step");
    }

    #[test]
    fn test_phases() {
        let mut tx = transmitter(2);
        tx.step(start(0b10));
        assert_eq!(Phase::StartBit, tx.phase());
        assert!(!tx.line());
        tx.step(WAIT);
        assert_eq!(Phase::StartBit, tx.phase(), "no pulse, no progress");
        tx.step(TICK);
        tx.step(TICK);
        assert_eq!(Phase::DataBits, tx.phase());
        assert!(!tx.line());
        assert_eq!(0, tx.regs().bit_count);
        tx.step(TICK);
        tx.step(TICK);
        assert!(tx.line());
        assert_eq!(1, tx.regs().bit_count);
        // bits 1 to 7
        for _ in 0..14 {
            tx.step(TICK);
        }
        assert_eq!(Phase::StopBit, tx.phase());
        assert!(tx.line());
        tx.step(TICK);
        assert!(!tx.done());
        tx.step(TICK);
        assert!(tx.done());
        assert_eq!(Phase::Idle, tx.phase());
    }

    #[test]
    fn test_enable_lags_phase() {
        let mut tx = transmitter(16);
        tx.step(start(0x55));
        assert_eq!(Phase::StartBit, tx.phase());
        assert!(!tx.enable_request());
        tx.step(WAIT);
        assert!(tx.enable_request());

        // and stays up one step after the frame
        while !tx.done() {
            tx.step(TICK);
        }
        assert!(tx.enable_request());
        tx.step(WAIT);
        assert!(!tx.enable_request());
    }

    #[test]
    fn test_busy_ignores_start() {
        let mut tx = transmitter(4);
        tx.step(start(0xf0));
        for _ in 0..9 {
            tx.step(TICK);
        }
        let before = *tx.regs();
        assert_eq!(Phase::DataBits, before.phase);
        tx.step(TxInput { start: true, data: 0x0f, tick: false });
        let after = *tx.regs();
        assert_eq!(before.phase, after.phase);
        assert_eq!(before.shift, after.shift);
        assert_eq!(before.line, after.line);
        assert_eq!(before.tick_count, after.tick_count);
    }

    #[test]
    fn test_reset_mid_frame() {
        let mut tx = transmitter(4);
        tx.step(start(0x00));
        for _ in 0..10 {
            tx.step(TICK);
        }
        assert_eq!(Phase::DataBits, tx.phase());
        assert!(!tx.line());
        tx.reset();
        assert_eq!(Phase::Idle, tx.phase());
        assert!(tx.line());
        assert!(!tx.enable_request());
        for _ in 0..100 {
            tx.step(TICK);
            assert!(!tx.done());
        }
    }

    #[test]
    fn test_data_width() {
        let config = TxConfig::new(1_000_000, 1000, 1).with_data_width(5);
        let mut tx = SerialTransmitter::new(&config).unwrap();
        // upper bits are not sent
        let levels = frame(&mut tx, 0b1110_0101);
        assert_eq!(vec![false, true, false, true, false, false, true], levels);
    }

    #[test]
    fn test_two_stop_bits() {
        let config = TxConfig::new(1_000_000, 1000, 4).with_stop_bits(StopBits::Two);
        let mut tx = SerialTransmitter::new(&config).unwrap();
        let levels = frame(&mut tx, 0xff);
        assert_eq!(44, levels.len());
        assert!(!levels[0]);
        assert!(levels[4..].iter().all(|&x| x));
    }

    #[test]
    fn test_next_is_pure() {
        let tx = transmitter(16);
        let q = *tx.regs();
        let d = tx.next(&q, start(0x41));
        assert_eq!(Phase::StartBit, d.phase);
        assert_eq!(q, *tx.regs());
        assert_eq!(Phase::Idle, tx.phase());
    }
}

//! Transmitter fed by a FIFO
//!
//! The FIFO is the holding side, the transmitter's shift buffer is the
//! shift-register side. A byte moves from one to the other on the first step
//! the transmitter is idle.

use crate::config::TxConfig;
use crate::error::ConfigError;
use crate::fifo::ring_buffer::Pop;
use crate::fifo::ring_buffer::Push;
use crate::fifo::ring_buffer::RingBuffer;
use crate::uart::subsystem::TransmitSubsystem;
use crate::uart::subsystem::TxOutput;
use std::fmt;
use tock_registers::interfaces::ReadWriteable;
use tock_registers::interfaces::Readable;
use tock_registers::interfaces::Writeable;
use tock_registers::register_bitfields;
use tock_registers::registers::InMemoryRegister;
use tock_registers::LocalRegisterCopy;

/// Outputs after a clock step.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct QueueOutput {
    pub tx: TxOutput,
    /// Outcome of the byte written this step
    pub pushed: Option<Push>,
    /// Byte handed to the transmitter this step
    pub started: Option<u8>,
}

/// Elastic buffer in front of a [`TransmitSubsystem`].
pub struct TransmitQueue<const N: usize> {
    pub fifo: RingBuffer<u8, N>,
    pub subsystem: TransmitSubsystem,
    pub lsr: InMemoryRegister<u8, LineStatus::Register>,
}
impl<const N: usize> TransmitQueue<N> {
    pub fn new(config: &TxConfig) -> Result<Self, ConfigError> {
        let queue = Self {
            fifo: RingBuffer::new(),
            subsystem: TransmitSubsystem::new(config)?,
            // THRE and TEMT set, like a 16550 after reset
            lsr: InMemoryRegister::new(0b0110_0000),
        };
        Ok(queue)
    }
    pub fn line(&self) -> bool {
        self.subsystem.line()
    }
    /// Nothing buffered and nothing on the line.
    pub fn is_idle(&self) -> bool {
        self.fifo.is_empty() && !self.subsystem.is_busy()
    }
    pub fn is_full(&self) -> bool {
        self.fifo.is_full()
    }
    /// One clock step, optionally writing a byte into the FIFO.
    ///
    /// The write and the hand-off to the transmitter commit together: a full
    /// FIFO rejects the write even if a byte leaves it on the same step.
    pub fn step(&mut self, write: Option<u8>) -> QueueOutput {
        let pop = !self.subsystem.is_busy() && !self.fifo.is_empty();
        let (pushed, popped) = self.fifo.step(write, pop);
        let started = popped.and_then(Pop::value);
        let tx = self.subsystem.step(started);

        if pushed == Some(Push::RejectedFull) {
            log::debug!("tx queue overrun, 0x{:02x} dropped", write.unwrap_or(0));
            self.lsr.modify(LineStatus::OE::OverrunError);
        }
        self.update_status();
        QueueOutput { tx, pushed, started }
    }
    /// Step with a byte written.
    pub fn write(&mut self, byte: u8) -> QueueOutput {
        self.step(Some(byte))
    }
    /// Step without a write.
    pub fn tick(&mut self) -> QueueOutput {
        self.step(None)
    }
    /// Line status without side effects.
    pub fn status(&self) -> LocalRegisterCopy<u8, LineStatus::Register> {
        self.lsr.extract()
    }
    /// Read the line status, clearing the latched bits.
    pub fn take_status(&mut self) -> LocalRegisterCopy<u8, LineStatus::Register> {
        let value = self.lsr.extract();
        self.lsr.modify(LineStatus::OE::NoOverrunError); // LH
        value
    }
    /// Drop buffered bytes and any frame in flight.
    pub fn reset(&mut self) {
        if !self.is_idle() {
            log::debug!("tx queue reset with {} buffered", self.fifo.len());
        }
        self.fifo.reset();
        self.subsystem.reset();
        self.lsr.set(0);
        self.update_status();
    }
    fn update_status(&mut self) {
        self.lsr.modify(LineStatus::THRE.val(self.fifo.is_empty().into()));
        self.lsr.modify(LineStatus::TEMT.val(self.is_idle().into()));
    }
}
impl<const N: usize> fmt::Debug for TransmitQueue<N> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt.debug_struct("TransmitQueue")
            .field("fifo", &self.fifo)
            .field("subsystem", &self.subsystem)
            .field("lsr", &format_args!("0x{:02x}", self.lsr.get()))
            .finish()
    }
}

// Bit positions follow the 16550 Line Status Register.
register_bitfields![u8,
    /// Transmit side of a Line Status Register
    pub LineStatus [
        /// Overrun Error, a write found the FIFO full (LH)
        OE OFFSET(1) NUMBITS(1) [OverrunError = 1, NoOverrunError = 0],
        /// Transmitter Holding (FIFO) empty
        THRE OFFSET(5) NUMBITS(1) [TransmitterHoldingRegisterEmpty = 1, TransmitterHoldingRegisterNotEmpty = 0],
        /// Transmitter Empty, FIFO empty and no frame in flight
        TEMT OFFSET(6) NUMBITS(1) [DoneTransmitting = 1, Transmitting = 0],
    ],
];

#[cfg(test)]
mod test {
    use super::*;

    fn queue<const N: usize>() -> TransmitQueue<N> {
        // one clock step per pulse, 4 pulses per bit
        TransmitQueue::new(&TxConfig::new(4000, 1000, 4)).unwrap()
    }

    #[test]
    fn test_reset_status() {
        let queue = queue::<4>();
        let status = queue.status();
        assert!(status.matches_all(LineStatus::THRE::TransmitterHoldingRegisterEmpty));
        assert!(status.matches_all(LineStatus::TEMT::DoneTransmitting));
        assert!(status.matches_all(LineStatus::OE::NoOverrunError));
        assert!(queue.line());
    }

    #[test]
    fn test_sends_in_order() {
        let mut queue = queue::<4>();
        let mut started = Vec::new();
        for byte in [1, 2, 3] {
            let out = queue.write(byte);
            assert_eq!(Some(Push::Accepted), out.pushed);
            started.extend(out.started);
        }
        let mut dones = 0;
        for _ in 0..1000 {
            let out = queue.tick();
            started.extend(out.started);
            if out.tx.done {
                dones += 1;
            }
        }
        assert_eq!(vec![1, 2, 3], started);
        assert_eq!(3, dones);
        assert!(queue.is_idle());
        assert!(queue.status().matches_all(LineStatus::TEMT::DoneTransmitting));
    }

    #[test]
    fn test_first_byte_starts_next_step() {
        let mut queue = queue::<4>();
        let out = queue.write(0x41);
        // the pop sees the FIFO as it was before the write
        assert_eq!(None, out.started);
        assert!(!out.tx.busy);
        assert!(queue.status().matches_all(LineStatus::THRE::TransmitterHoldingRegisterNotEmpty));
        let out = queue.tick();
        assert_eq!(Some(0x41), out.started);
        assert!(out.tx.busy);
        assert!(!out.tx.line);
        assert!(queue.status().matches_all(LineStatus::THRE::TransmitterHoldingRegisterEmpty));
        assert!(queue.status().matches_all(LineStatus::TEMT::Transmitting));
    }

    #[test]
    fn test_overrun() {
        let mut queue = queue::<2>();
        queue.write(1);
        queue.write(2); // 1 moves to the transmitter
        queue.write(3);
        let out = queue.write(4);
        assert_eq!(Some(Push::RejectedFull), out.pushed);
        assert!(queue.status().matches_all(LineStatus::OE::OverrunError));
        // latched until read
        queue.tick();
        assert!(queue.take_status().matches_all(LineStatus::OE::OverrunError));
        assert!(queue.take_status().matches_all(LineStatus::OE::NoOverrunError));

        let mut started = Vec::new();
        for _ in 0..500 {
            started.extend(queue.tick().started);
        }
        assert_eq!(vec![2, 3], started);
    }

    #[test]
    fn test_write_while_full_and_draining() {
        let mut queue = queue::<1>();
        queue.write(1);
        queue.tick(); // 1 moves to the transmitter
        queue.write(2);
        assert!(queue.is_full());
        while queue.subsystem.is_busy() {
            queue.tick();
        }
        // 2 leaves on this step, but the write still sees a full FIFO
        let out = queue.write(3);
        assert_eq!(Some(2), out.started);
        assert_eq!(Some(Push::RejectedFull), out.pushed);
        assert!(queue.fifo.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut queue = queue::<4>();
        for byte in 0..6 {
            queue.write(byte);
        }
        queue.reset();
        assert!(queue.is_idle());
        assert!(queue.line());
        let status = queue.take_status();
        assert!(status.matches_all(LineStatus::OE::NoOverrunError));
        assert!(status.matches_all(LineStatus::TEMT::DoneTransmitting));
        for _ in 0..500 {
            let out = queue.tick();
            assert_eq!(None, out.started);
            assert!(!out.tx.done);
        }
    }
}

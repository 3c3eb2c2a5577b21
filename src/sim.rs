//! Step source
//!
//! Clocks a [`TransmitQueue`] and keeps a bounded history of what happened
//! on the serial line, in place of a waveform dump.

use crate::config::TxConfig;
use crate::error::ConfigError;
use crate::uart::queue::QueueOutput;
use crate::uart::queue::TransmitQueue;
use circular_buffer::CircularBuffer;

/// Something observed on the line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    /// The line changed to `level` after clock step `cycle`
    Line { cycle: u64, level: bool },
    /// A frame finished after clock step `cycle`
    Done { cycle: u64 },
}

/// Bounded event history, the oldest events are dropped first.
#[derive(Debug, Clone)]
pub struct LineTrace<const H: usize> {
    events: CircularBuffer<H, Event>,
}
impl<const H: usize> LineTrace<H> {
    pub fn new() -> Self {
        Self { events: CircularBuffer::new() }
    }
    pub fn record(&mut self, event: Event) {
        self.events.push_back(event);
    }
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
    pub fn done_cycles(&self) -> impl Iterator<Item = u64> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Done { cycle } => Some(*cycle),
            _ => None,
        })
    }
    /// Line as `(level, cycles)` runs, from the first recorded change up to `end`.
    pub fn levels(&self, end: u64) -> Vec<(bool, u64)> {
        let mut runs = Vec::new();
        let mut last: Option<(bool, u64)> = None;
        for event in self.events.iter() {
            if let Event::Line { cycle, level } = *event {
                if let Some((prev_level, since)) = last {
                    runs.push((prev_level, cycle - since));
                }
                last = Some((level, cycle));
            }
        }
        if let Some((level, since)) = last {
            runs.push((level, end.saturating_sub(since)));
        }
        runs
    }
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
impl<const H: usize> Default for LineTrace<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// A transmit queue and the clock driving it.
#[derive(Debug)]
pub struct Simulation<const N: usize, const H: usize> {
    pub queue: TransmitQueue<N>,
    pub trace: LineTrace<H>,
    cycle: u64,
    line: bool,
}
impl<const N: usize, const H: usize> Simulation<N, H> {
    pub fn new(config: &TxConfig) -> Result<Self, ConfigError> {
        Ok(Self { queue: TransmitQueue::new(config)?, trace: LineTrace::new(), cycle: 0, line: true })
    }
    /// Clock steps so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
    /// One clock step.
    pub fn step(&mut self, write: Option<u8>) -> QueueOutput {
        let out = self.queue.step(write);
        self.cycle += 1;
        if out.tx.line != self.line {
            self.line = out.tx.line;
            self.trace.record(Event::Line { cycle: self.cycle, level: self.line });
        }
        if out.tx.done {
            self.trace.record(Event::Done { cycle: self.cycle });
        }
        out
    }
    /// Write bytes, one per step, until the FIFO is full. Returns how many were taken.
    pub fn send(&mut self, bytes: &[u8]) -> usize {
        let mut sent = 0;
        for &byte in bytes {
            if self.queue.is_full() {
                break;
            }
            self.step(Some(byte));
            sent += 1;
        }
        sent
    }
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.step(None);
        }
    }
    /// Run until everything was sent. Returns the cycle count, `None` if `max_cycles` ran out first.
    pub fn run_until_idle(&mut self, max_cycles: u64) -> Option<u64> {
        for _ in 0..max_cycles {
            if self.queue.is_idle() {
                return Some(self.cycle);
            }
            self.step(None);
        }
        self.queue.is_idle().then_some(self.cycle)
    }
    /// Reset everything but the cycle counter.
    pub fn reset(&mut self) {
        self.queue.reset();
        if !self.line {
            self.line = true;
            self.trace.record(Event::Line { cycle: self.cycle, level: true });
        }
    }
}

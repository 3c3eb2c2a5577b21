//! Synchronous FIFO over a fixed array
//!
//! The occupancy is its own counter, never derived from the pointers: when
//! full or empty both pointers are equal.

use std::fmt;
use tock_registers::register_bitfields;
use tock_registers::LocalRegisterCopy;

/// Distance from the ends at which the almost-full/almost-empty flags trip.
pub const ALMOST_MARGIN: usize = 2;

/// Outcome of a push.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Push {
    Accepted,
    /// Overflow, nothing was stored
    RejectedFull,
}
impl Push {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Outcome of a pop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pop<T> {
    Accepted(T),
    /// Underflow, nothing was read
    RejectedEmpty,
}
impl<T> Pop<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Accepted(x) => Some(x),
            Self::RejectedEmpty => None,
        }
    }
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Fixed-capacity FIFO.
///
/// Every operation is one clock step. [`RingBuffer::step`] models a push and
/// a pop issued in the same step, both judged against the occupancy of the
/// previous step.
#[derive(Clone)]
pub struct RingBuffer<T, const N: usize> {
    storage: [T; N],
    write_index: usize,
    read_index: usize,
    occupancy: usize,
}
impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    const NON_ZERO: () = assert!(N > 0, "RingBuffer capacity must be non-zero");

    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO;
        Self { storage: [T::default(); N], write_index: 0, read_index: 0, occupancy: 0 }
    }
    pub const fn capacity(&self) -> usize {
        N
    }
    /// Number of valid unread elements.
    pub fn len(&self) -> usize {
        self.occupancy
    }
    pub fn write_index(&self) -> usize {
        self.write_index
    }
    pub fn read_index(&self) -> usize {
        self.read_index
    }
    pub fn is_full(&self) -> bool {
        self.occupancy == N
    }
    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }
    pub fn is_almost_full(&self) -> bool {
        self.occupancy >= N.saturating_sub(ALMOST_MARGIN)
    }
    pub fn is_almost_empty(&self) -> bool {
        self.occupancy <= ALMOST_MARGIN
    }
    /// Snapshot of the flags.
    pub fn status(&self) -> LocalRegisterCopy<u8, FifoStatus::Register> {
        let mut status = LocalRegisterCopy::new(0);
        status.modify(FifoStatus::FULL.val(self.is_full().into()));
        status.modify(FifoStatus::EMPTY.val(self.is_empty().into()));
        status.modify(FifoStatus::ALMOST_FULL.val(self.is_almost_full().into()));
        status.modify(FifoStatus::ALMOST_EMPTY.val(self.is_almost_empty().into()));
        status
    }
    pub fn push(&mut self, value: T) -> Push {
        if self.is_full() {
            return Push::RejectedFull;
        }
        self.storage[self.write_index] = value;
        self.write_index = (self.write_index + 1) % N;
        self.occupancy += 1;
        Push::Accepted
    }
    pub fn pop(&mut self) -> Pop<T> {
        if self.is_empty() {
            return Pop::RejectedEmpty;
        }
        let value = self.storage[self.read_index];
        self.read_index = (self.read_index + 1) % N;
        self.occupancy -= 1;
        Pop::Accepted(value)
    }
    /// Next value a pop would return.
    pub fn peek(&self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(self.storage[self.read_index])
        }
    }
    /// One clock step with optional push and pop requests.
    ///
    /// Both requests see the flags of the previous step, so a full buffer
    /// still rejects the push while the pop frees a slot, and an empty
    /// buffer rejects the pop while the push fills one.
    pub fn step(&mut self, push: Option<T>, pop: bool) -> (Option<Push>, Option<Pop<T>>) {
        let full = self.is_full();
        let empty = self.is_empty();

        let popped = pop.then(|| {
            if empty {
                Pop::RejectedEmpty
            } else {
                // a valid pop means occupancy > 0, so read_index is never the slot written below
                let value = self.storage[self.read_index];
                self.read_index = (self.read_index + 1) % N;
                Pop::Accepted(value)
            }
        });
        let pushed = push.map(|value| {
            if full {
                Push::RejectedFull
            } else {
                self.storage[self.write_index] = value;
                self.write_index = (self.write_index + 1) % N;
                Push::Accepted
            }
        });

        if pushed.is_some_and(Push::is_accepted) {
            self.occupancy += 1;
        }
        if popped.as_ref().is_some_and(Pop::is_accepted) {
            self.occupancy -= 1;
        }
        (pushed, popped)
    }
    /// Forget every element. Storage is left as-is, it can't be read while empty.
    pub fn reset(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
        self.occupancy = 0;
    }
}
impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T, const N: usize> fmt::Debug for RingBuffer<T, N> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt.debug_struct("RingBuffer")
            .field("capacity", &N)
            .field("write_index", &self.write_index)
            .field("read_index", &self.read_index)
            .field("occupancy", &self.occupancy)
            .finish()
    }
}

register_bitfields![u8,
    /// FIFO flags, recomputed from the occupancy
    pub FifoStatus [
        /// occupancy == capacity
        FULL OFFSET(0) NUMBITS(1) [Full = 1, NotFull = 0],
        /// occupancy == 0
        EMPTY OFFSET(1) NUMBITS(1) [Empty = 1, NotEmpty = 0],
        /// occupancy >= capacity - 2
        ALMOST_FULL OFFSET(2) NUMBITS(1) [AlmostFull = 1, NotAlmostFull = 0],
        /// occupancy <= 2
        ALMOST_EMPTY OFFSET(3) NUMBITS(1) [AlmostEmpty = 1, NotAlmostEmpty = 0],
    ],
];

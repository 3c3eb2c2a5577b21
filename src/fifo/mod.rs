//! First-in first-out buffers
//!
//! # [FIFO](https://en.wikipedia.org/wiki/FIFO_(computing_and_electronics)):
//! * [RingBuffer](crate::fifo::ring_buffer) with full/empty/almost-full/almost-empty flags
//!
//! # References
//! * http://www.sunburst-design.com/papers/CummingsSNUG2002SJ_FIFO1.pdf

pub mod ring_buffer;

//! Crate uart-tx
//!
//! Cycle-accurate model of a synchronous FIFO and a UART transmitter. Every
//! component advances once per call to its step function, with all next
//! values computed from the registers of the previous step.

pub mod c;
pub mod config;
pub mod error;
pub mod fifo;
pub mod sim;
pub mod uart;
pub mod utils;

pub use config::StopBits;
pub use config::TxConfig;
pub use error::ConfigError;
pub use fifo::ring_buffer::RingBuffer;
pub use uart::baud::TickDivider;
pub use uart::queue::TransmitQueue;
pub use uart::subsystem::TransmitSubsystem;
pub use uart::transmitter::SerialTransmitter;

//! Serial communication stuff
//!
//! # [UART](https://en.wikipedia.org/wiki/Universal_asynchronous_receiver-transmitter) transmit side:
//! * [baud generator](crate::uart::baud)
//! * [transmitter state machine](crate::uart::transmitter)
//! * [both wired together](crate::uart::subsystem)
//! * [FIFO-fed transmitter](crate::uart::queue)
//!
//! # References
//! * https://www.circuitbasics.com/basics-uart-communication/
//! * https://www.nandland.com/vhdl/modules/module-uart-serial-port-rs232.html

pub mod baud;
pub mod queue;
pub mod subsystem;
pub mod transmitter;

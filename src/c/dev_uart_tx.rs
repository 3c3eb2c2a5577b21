//! C interface for [`crate::uart::queue::TransmitQueue`].

use crate::c::prelude::*;
use crate::config::TxConfig;
use crate::uart::queue::TransmitQueue;

/// Depth of the transmit FIFO handed to C.
pub const TX_FIFO_DEPTH: usize = 16;

/// Output bits of [`uart_tx_tick`].
pub const UART_TX_LINE: u8 = 0b001;
pub const UART_TX_DONE: u8 = 0b010;
pub const UART_TX_BUSY: u8 = 0b100;

/// Transmitter that can be used by multiple threads.
pub struct MutexTransmitQueue(Mutex<TransmitQueue<TX_FIFO_DEPTH>>);
impl MutexTransmitQueue {
    fn with<R>(ptr: *mut MutexTransmitQueue, f: impl FnOnce(&mut TransmitQueue<TX_FIFO_DEPTH>) -> R) -> Option<R> {
        let queue = NonNull::new(ptr)?;
        let queue = unsafe { queue.as_ref() };
        Some(f(&mut *lock(&queue.0)))
    }
}

/// Allocate a new transmitter with 8 data bits and 1 stop bit.
/// Returns NULL if the rates are unusable.
#[no_mangle]
pub extern "C" fn uart_tx_new(clock_hz: c_uint, baud_rate: c_uint, oversampling: c_uint) -> *mut MutexTransmitQueue {
    match TransmitQueue::new(&TxConfig::new(clock_hz, baud_rate, oversampling)) {
        Ok(queue) => Box::into_raw(Box::new(MutexTransmitQueue(Mutex::new(queue)))), // memory managed by C
        Err(err) => {
            log::error!("uart_tx_new: {}", err);
            null_mut()
        }
    }
}

/// Deallocate a transmitter.
#[no_mangle]
pub extern "C" fn uart_tx_drop(queue: *mut MutexTransmitQueue) {
    if let Some(queue) = NonNull::new(queue) {
        let _ = unsafe { Box::from_raw(queue.as_ptr()) }; // memory managed by rust
    }
}

/// Clock step writing a byte. Returns 1 if the byte was queued, 0 if it was dropped.
#[no_mangle]
pub extern "C" fn uart_tx_write(queue: *mut MutexTransmitQueue, byte: u8) -> c_int {
    MutexTransmitQueue::with(queue, |queue| queue.write(byte).pushed.is_some_and(|x| x.is_accepted())).unwrap_or(false).into()
}

/// Clock step. Returns `UART_TX_*` bits.
#[no_mangle]
pub extern "C" fn uart_tx_tick(queue: *mut MutexTransmitQueue) -> u8 {
    MutexTransmitQueue::with(queue, |queue| {
        let out = queue.tick().tx;
        let mut bits = 0;
        if out.line {
            bits |= UART_TX_LINE;
        }
        if out.done {
            bits |= UART_TX_DONE;
        }
        if out.busy {
            bits |= UART_TX_BUSY;
        }
        bits
    })
    .unwrap_or(UART_TX_LINE)
}

/// Serial line level, idle high.
#[no_mangle]
pub extern "C" fn uart_tx_line(queue: *mut MutexTransmitQueue) -> bool {
    MutexTransmitQueue::with(queue, |queue| queue.line()).unwrap_or(true)
}

/// Read the line status (OE, THRE, TEMT at their 16550 positions). Clears OE.
#[no_mangle]
pub extern "C" fn uart_tx_status(queue: *mut MutexTransmitQueue) -> u8 {
    MutexTransmitQueue::with(queue, |queue| queue.take_status().get()).unwrap_or(0)
}

/// Drop buffered bytes and any frame in flight.
#[no_mangle]
pub extern "C" fn uart_tx_reset(queue: *mut MutexTransmitQueue) {
    MutexTransmitQueue::with(queue, |queue| queue.reset());
}

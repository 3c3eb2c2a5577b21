//! C interface for [`crate::fifo::ring_buffer::RingBuffer`].

use crate::c::prelude::*;
use crate::fifo::ring_buffer::Pop;
use crate::fifo::ring_buffer::RingBuffer;

/// Depth of the FIFO handed to C.
pub const FIFO_DEPTH: usize = 16;

/// Byte FIFO that can be used by multiple threads.
pub struct MutexFifo(Mutex<RingBuffer<u8, FIFO_DEPTH>>);

/// Allocate a new FIFO.
#[no_mangle]
pub extern "C" fn uart_fifo_new() -> *mut MutexFifo {
    let fifo = Box::new(MutexFifo(Mutex::new(RingBuffer::new())));
    Box::into_raw(fifo) // memory managed by C
}

/// Deallocate a FIFO.
#[no_mangle]
pub extern "C" fn uart_fifo_drop(fifo: *mut MutexFifo) {
    if let Some(fifo) = NonNull::new(fifo) {
        let _ = unsafe { Box::from_raw(fifo.as_ptr()) }; // memory managed by rust
    }
}

/// Push a byte. Returns 1 if accepted, 0 if the FIFO was full.
#[no_mangle]
pub extern "C" fn uart_fifo_push(fifo: *mut MutexFifo, value: u8) -> c_int {
    let Some(fifo) = NonNull::new(fifo) else {
        return 0;
    };
    let fifo = unsafe { fifo.as_ref() };
    lock(&fifo.0).push(value).is_accepted().into()
}

/// Pop a byte into `value`. Returns 1 if a byte was popped, 0 if the FIFO was empty.
#[no_mangle]
pub extern "C" fn uart_fifo_pop(fifo: *mut MutexFifo, value: *mut u8) -> c_int {
    let Some(fifo) = NonNull::new(fifo) else {
        return 0;
    };
    let fifo = unsafe { fifo.as_ref() };
    match lock(&fifo.0).pop() {
        Pop::Accepted(x) => {
            if let Some(mut value) = NonNull::new(value) {
                unsafe { *value.as_mut() = x };
            }
            1
        }
        Pop::RejectedEmpty => 0,
    }
}

/// Flags: bit0 full, bit1 empty, bit2 almost full, bit3 almost empty.
#[no_mangle]
pub extern "C" fn uart_fifo_status(fifo: *mut MutexFifo) -> u8 {
    let Some(fifo) = NonNull::new(fifo) else {
        return 0;
    };
    let fifo = unsafe { fifo.as_ref() };
    lock(&fifo.0).status().get()
}

/// Number of buffered bytes.
#[no_mangle]
pub extern "C" fn uart_fifo_len(fifo: *mut MutexFifo) -> c_uint {
    let Some(fifo) = NonNull::new(fifo) else {
        return 0;
    };
    let fifo = unsafe { fifo.as_ref() };
    // bounded by FIFO_DEPTH
    lock(&fifo.0).len() as c_uint
}

/// Forget every buffered byte.
#[no_mangle]
pub extern "C" fn uart_fifo_reset(fifo: *mut MutexFifo) {
    if let Some(fifo) = NonNull::new(fifo) {
        let fifo = unsafe { fifo.as_ref() };
        lock(&fifo.0).reset();
    }
}

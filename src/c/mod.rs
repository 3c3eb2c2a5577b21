//! Stuff that interacts with C code.
//!
//! A C/C++ harness owns the clock: it allocates the models here, calls the
//! tick function once per clock step and samples the outputs.

pub(crate) mod prelude {
    //! What is needed to interact with C code.

    pub(crate) use std::ffi::*;
    pub(crate) use std::ptr::null_mut;
    pub(crate) use std::ptr::NonNull;
    pub(crate) use std::sync::Mutex;
    pub(crate) use std::sync::MutexGuard;
    pub(crate) use std::sync::PoisonError;

    /// Lock a model shared with C, a panicked holder does not poison it for the harness.
    pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub mod dev_fifo;
pub mod dev_uart_tx;

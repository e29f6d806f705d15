//! C FFI bindings for the Ballast memory-pressure toolkit.
//!
//! Exposes a C-compatible API for host applications. This crate is one
//! of two that may contain `unsafe` code (along with `ballast-alloc`).
//!
//! Three surfaces are exported:
//!
//! - [`legacy`]: `ballast_allocate_memory` / `ballast_free_allocated_memory`
//!   over a single process-wide holder, fire-and-forget.
//! - [`config`]: config builders behind opaque `u64` handles.
//! - [`session`]: independent holders behind opaque `u64` handles, with
//!   status codes for every outcome.
//!
//! Every entry point runs under `ffi_guard!`; a Rust panic never
//! unwinds into the host. The message of the last caught panic on the
//! calling thread is available from [`ballast_last_panic_message`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Run `$body` (which must evaluate to an `i32` status), converting a
/// panic into `BallastStatus::Panicked`.
#[macro_export]
#[doc(hidden)]
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $crate::status::BallastStatus::Panicked as i32
            }
        }
    };
}

/// Like `ffi_guard!` for entry points that do not return a status:
/// evaluates to `$fallback` if `$body` panics.
#[macro_export]
#[doc(hidden)]
macro_rules! ffi_guard_or {
    ($fallback:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $fallback
            }
        }
    };
}

/// Lock a mutex inside an `ffi_guard!` body, returning
/// `BallastStatus::InternalError` if it is poisoned.
#[macro_export]
#[doc(hidden)]
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::BallastStatus::InternalError as i32,
        }
    };
}

pub mod config;
mod handle;
pub mod legacy;
pub mod session;
pub mod status;
pub mod types;

thread_local! {
    /// Message of the most recent panic caught on this thread.
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Store a caught panic payload as this thread's last panic message.
#[doc(hidden)]
pub fn record_panic(payload: &(dyn Any + Send)) {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    tracing::warn!(%message, "panic caught at FFI boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = message);
}

/// Copy the last panic message caught on this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator),
/// or 0 if no panic has been caught. At most `buf_len - 1` bytes are
/// copied and the result is always NUL-terminated when `buf_len > 0`.
/// Pass a null `buf` to query the length.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_last_panic_message(buf: *mut c_char, buf_len: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let message = cell.borrow();
        let bytes = message.as_bytes();
        if !buf.is_null() && buf_len > 0 {
            let n = bytes.len().min(buf_len - 1);
            // SAFETY: buf is valid for buf_len bytes per caller contract and
            // n + 1 <= buf_len.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        bytes.len().min(i32::MAX as usize) as i32
    })
}

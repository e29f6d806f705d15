//! Session FFI: independent holders behind opaque handles.
//!
//! Each session is an `Arc<SharedHolder>`, so the global `SESSIONS` lock
//! is only held for the handle lookup. Allocations on different sessions
//! run concurrently; calls on one session are serialised by its own lock.

use std::sync::{Arc, Mutex};

use ballast_alloc::SharedHolder;

use crate::config::configs;
use crate::handle::HandleTable;
use crate::status::BallastStatus;
use crate::types::BallastHolderState;

static SESSIONS: Mutex<HandleTable<Arc<SharedHolder>>> = Mutex::new(HandleTable::new());

/// Snapshot of a session's state and counters.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BallastSessionInfo {
    /// A `BallastHolderState` tag.
    pub state: i32,
    /// Size of the held block in bytes, 0 when empty.
    pub held_bytes: u64,
    /// Pages written when the held block was committed.
    pub touched_pages: u64,
    /// Successful allocations over the session's lifetime.
    pub allocations: u64,
    /// Blocks freed over the session's lifetime.
    pub releases: u64,
    /// Failed allocation requests.
    pub failures: u64,
    /// Largest block ever held, in bytes.
    pub peak_bytes: u64,
}

const _: () = assert!(std::mem::size_of::<BallastSessionInfo>() == 56);
const _: () = assert!(std::mem::align_of::<BallastSessionInfo>() == 8);

/// Clone the Arc for a session handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
fn get_session(handle: u64) -> Option<Arc<SharedHolder>> {
    SESSIONS.lock().ok()?.get(handle).cloned()
}

fn insert_session(holder: SharedHolder) -> Option<u64> {
    Some(SESSIONS.lock().ok()?.insert(Arc::new(holder)))
}

/// Create a session from a config handle. Consumes the config.
///
/// The config is removed from its table before anything else is checked,
/// so it is consumed even when this call fails.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_session_create(config_handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({
        let config = match ffi_lock!(configs()).remove(config_handle) {
            Some(c) => c,
            None => return BallastStatus::InvalidHandle as i32,
        };
        if out.is_null() {
            return BallastStatus::InvalidArgument as i32;
        }
        let holder = match SharedHolder::with_config(config) {
            Ok(h) => h,
            Err(e) => return BallastStatus::from(&e) as i32,
        };
        let Some(handle) = insert_session(holder) else {
            return BallastStatus::InternalError as i32;
        };
        tracing::debug!(handle, max_block_bytes = config.max_block_bytes, "session created");
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = handle };
        BallastStatus::Ok as i32
    })
}

/// Create a session with the default configuration.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_session_create_default(out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return BallastStatus::InvalidArgument as i32;
        }
        let Some(handle) = insert_session(SharedHolder::new()) else {
            return BallastStatus::InternalError as i32;
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = handle };
        BallastStatus::Ok as i32
    })
}

/// Destroy a session, freeing any block it holds.
///
/// If another thread is inside a call on this session, the block is freed
/// when that call returns.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_session_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(SESSIONS).remove(handle) {
            Some(_) => BallastStatus::Ok as i32,
            None => BallastStatus::InvalidHandle as i32,
        }
    })
}

/// Replace the session's block with one sized for `intensity`.
///
/// On success the block size is written to `bytes_out` if non-null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_session_allocate(handle: u64, intensity: i32, bytes_out: *mut u64) -> i32 {
    ffi_guard!({
        let Some(session) = get_session(handle) else {
            return BallastStatus::InvalidHandle as i32;
        };
        match session.allocate(intensity) {
            Ok(bytes) => {
                if !bytes_out.is_null() {
                    // SAFETY: bytes_out is non-null and valid per caller contract.
                    unsafe { *bytes_out = bytes as u64 };
                }
                BallastStatus::Ok as i32
            }
            Err(e) => BallastStatus::from(&e) as i32,
        }
    })
}

/// Free the session's block, if any.
///
/// Writes 1 to `released_out` if a block was freed and 0 otherwise, when
/// `released_out` is non-null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_session_release(handle: u64, released_out: *mut u8) -> i32 {
    ffi_guard!({
        let Some(session) = get_session(handle) else {
            return BallastStatus::InvalidHandle as i32;
        };
        match session.release() {
            Ok(released) => {
                if !released_out.is_null() {
                    // SAFETY: released_out is non-null and valid per caller contract.
                    unsafe { *released_out = u8::from(released) };
                }
                BallastStatus::Ok as i32
            }
            Err(e) => BallastStatus::from(&e) as i32,
        }
    })
}

/// Fill `out` with the session's current state and counters.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_session_info_get(handle: u64, out: *mut BallastSessionInfo) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return BallastStatus::InvalidArgument as i32;
        }
        let Some(session) = get_session(handle) else {
            return BallastStatus::InvalidHandle as i32;
        };
        let snapshot = session.with(|h| {
            let stats = h.stats();
            BallastSessionInfo {
                state: BallastHolderState::from(h.state()) as i32,
                held_bytes: h.held_bytes() as u64,
                touched_pages: h.block().map_or(0, |b| b.touched_pages() as u64),
                allocations: stats.allocations,
                releases: stats.releases,
                failures: stats.failures,
                peak_bytes: stats.peak_bytes as u64,
            }
        });
        match snapshot {
            Ok(info) => {
                // SAFETY: out is non-null and valid per caller contract.
                unsafe { *out = info };
                BallastStatus::Ok as i32
            }
            Err(e) => BallastStatus::from(&e) as i32,
        }
    })
}

/// Check that every touched page of the held block still carries the
/// marker byte.
///
/// Returns `NOT_HOLDING` when the session is empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_session_verify(handle: u64) -> i32 {
    ffi_guard!({
        let Some(session) = get_session(handle) else {
            return BallastStatus::InvalidHandle as i32;
        };
        let outcome = session.with(|h| match h.block() {
            None => BallastStatus::NotHolding,
            Some(block) if block.verify() => BallastStatus::Ok,
            Some(_) => BallastStatus::VerifyFailed,
        });
        match outcome {
            Ok(status) => status as i32,
            Err(e) => BallastStatus::from(&e) as i32,
        }
    })
}

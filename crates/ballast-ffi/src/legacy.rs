//! Process-wide allocate/free entry points.
//!
//! One [`SharedHolder`] with the default configuration serves the whole
//! process. [`ballast_allocate_memory`] and
//! [`ballast_free_allocated_memory`] report nothing back; the `_status`
//! and `allocated_bytes` variants expose what they did.

use ballast_alloc::SharedHolder;

use crate::status::BallastStatus;

static PROCESS_HOLDER: SharedHolder = SharedHolder::new();

/// Replace the process-wide block with one sized for `intensity`.
///
/// Failures leave the holder empty and are not reported.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_allocate_memory(intensity: i32) {
    ffi_guard_or!((), {
        if let Err(e) = PROCESS_HOLDER.allocate(intensity) {
            tracing::debug!(intensity, error = %e, "process-wide allocation failed");
        }
    })
}

/// Free the process-wide block. A no-op when nothing is held.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_free_allocated_memory() {
    ffi_guard_or!((), {
        release_or_log(&PROCESS_HOLDER);
    })
}

fn release_or_log(holder: &SharedHolder) -> bool {
    match holder.release() {
        Ok(freed) => freed,
        Err(e) => {
            tracing::debug!(error = %e, "process-wide release failed");
            false
        }
    }
}

/// Like [`ballast_allocate_memory`], returning a `BallastStatus`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_allocate_memory_status(intensity: i32) -> i32 {
    ffi_guard!({
        match PROCESS_HOLDER.allocate(intensity) {
            Ok(_) => BallastStatus::Ok as i32,
            Err(e) => BallastStatus::from(&e) as i32,
        }
    })
}

/// Size of the process-wide block in bytes, 0 when empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_allocated_bytes() -> u64 {
    ffi_guard_or!(0, {
        PROCESS_HOLDER
            .with(|h| h.held_bytes() as u64)
            .unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_core::BallastConfig;

    // The holder is process-wide, so every assertion lives in one test.
    #[test]
    fn process_wide_holder_lifecycle() {
        let full = BallastConfig::DEFAULT_MAX_BLOCK_BYTES as u64;

        ballast_free_allocated_memory();
        assert_eq!(ballast_allocated_bytes(), 0);

        ballast_allocate_memory(1);
        assert_eq!(ballast_allocated_bytes(), 5_368_709);
        assert!(PROCESS_HOLDER.verify_touched().unwrap());

        ballast_allocate_memory(2);
        assert_eq!(ballast_allocated_bytes(), full * 2 / 100);

        // Clamped under the default policy.
        ballast_allocate_memory(-40);
        assert_eq!(ballast_allocated_bytes(), 0);
        assert_eq!(ballast_allocate_memory_status(0), BallastStatus::Ok as i32);
        assert_eq!(ballast_allocated_bytes(), 0);

        assert_eq!(ballast_allocate_memory_status(3), BallastStatus::Ok as i32);
        assert_eq!(ballast_allocated_bytes(), full * 3 / 100);

        ballast_free_allocated_memory();
        ballast_free_allocated_memory();
        assert_eq!(ballast_allocated_bytes(), 0);

        let stats = PROCESS_HOLDER.stats().unwrap();
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.allocations, stats.releases);
    }

    #[test]
    fn failed_release_is_swallowed() {
        let holder = SharedHolder::with_config(BallastConfig::with_max_block_bytes(8192)).unwrap();
        holder.allocate(100).unwrap();
        assert!(release_or_log(&holder));
        assert!(!release_or_log(&holder));

        let poisoned = std::sync::Arc::new(holder);
        let p = std::sync::Arc::clone(&poisoned);
        let _ = std::thread::spawn(move || {
            let _ = p.with(|_| panic!("poison the holder"));
        })
        .join();
        assert!(!release_or_log(&poisoned));
    }
}

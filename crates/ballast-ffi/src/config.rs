//! Config builder FFI: populate a [`BallastConfig`] behind an opaque handle.
//!
//! C callers create a config, adjust it field by field, then pass the
//! handle to `ballast_session_create`, which consumes it. Every setter
//! validates the resulting config and leaves it unchanged on failure.

use std::sync::Mutex;

use ballast_core::BallastConfig;

use crate::handle::HandleTable;
use crate::status::BallastStatus;
use crate::types::BallastIntensityPolicy;

static CONFIGS: Mutex<HandleTable<BallastConfig>> = Mutex::new(HandleTable::new());

pub(crate) fn configs() -> &'static Mutex<HandleTable<BallastConfig>> {
    &CONFIGS
}

/// Apply `edit` to a copy of the config behind `handle` and store it if
/// it validates.
fn update(handle: u64, edit: impl FnOnce(&mut BallastConfig)) -> i32 {
    let mut table = ffi_lock!(CONFIGS);
    let Some(config) = table.get_mut(handle) else {
        return BallastStatus::InvalidHandle as i32;
    };
    let mut candidate = *config;
    edit(&mut candidate);
    if let Err(e) = candidate.validate() {
        tracing::debug!(error = %e, "config update rejected");
        return BallastStatus::from(&e) as i32;
    }
    *config = candidate;
    BallastStatus::Ok as i32
}

// ── FFI functions ───────────────────────────────────────────────

/// Create a config with default values. Returns the handle via `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_config_create(out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return BallastStatus::InvalidArgument as i32;
        }
        let handle = ffi_lock!(CONFIGS).insert(BallastConfig::default());
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = handle };
        BallastStatus::Ok as i32
    })
}

/// Destroy a config that was not consumed by a session.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_config_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(CONFIGS).remove(handle) {
            Some(_) => BallastStatus::Ok as i32,
            None => BallastStatus::InvalidHandle as i32,
        }
    })
}

/// Set the block size at intensity 100, in bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_config_set_max_block_bytes(handle: u64, bytes: u64) -> i32 {
    ffi_guard!({
        let Ok(bytes) = usize::try_from(bytes) else {
            return BallastStatus::ConfigError as i32;
        };
        update(handle, |c| c.max_block_bytes = bytes)
    })
}

/// Set the distance between touched bytes. Must be a power of two.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_config_set_page_stride(handle: u64, stride: u64) -> i32 {
    ffi_guard!({
        let Ok(stride) = usize::try_from(stride) else {
            return BallastStatus::ConfigError as i32;
        };
        update(handle, |c| c.page_stride = stride)
    })
}

/// Set the byte written to each touched page.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_config_set_touch_marker(handle: u64, marker: u8) -> i32 {
    ffi_guard!({ update(handle, |c| c.touch_marker = marker) })
}

/// Set the out-of-range intensity policy (a `BallastIntensityPolicy` tag).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ballast_config_set_intensity_policy(handle: u64, policy: i32) -> i32 {
    ffi_guard!({
        let Some(policy) = BallastIntensityPolicy::from_raw(policy) else {
            return BallastStatus::InvalidArgument as i32;
        };
        update(handle, |c| c.intensity_policy = policy.into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_core::IntensityPolicy;

    fn create() -> u64 {
        let mut h = 0u64;
        assert_eq!(ballast_config_create(&mut h), BallastStatus::Ok as i32);
        h
    }

    fn read(h: u64) -> BallastConfig {
        *configs().lock().unwrap().get(h).unwrap()
    }

    #[test]
    fn create_null_out_is_invalid_argument() {
        assert_eq!(
            ballast_config_create(std::ptr::null_mut()),
            BallastStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn create_starts_from_defaults() {
        let h = create();
        assert_eq!(read(h), BallastConfig::default());
        assert_eq!(ballast_config_destroy(h), BallastStatus::Ok as i32);
    }

    #[test]
    fn setters_update_fields() {
        let h = create();
        assert_eq!(ballast_config_set_max_block_bytes(h, 65536), 0);
        assert_eq!(ballast_config_set_page_stride(h, 1024), 0);
        assert_eq!(ballast_config_set_touch_marker(h, 0xAB), 0);
        assert_eq!(
            ballast_config_set_intensity_policy(h, BallastIntensityPolicy::Reject as i32),
            0
        );
        let c = read(h);
        assert_eq!(c.max_block_bytes, 65536);
        assert_eq!(c.page_stride, 1024);
        assert_eq!(c.touch_marker, 0xAB);
        assert_eq!(c.intensity_policy, IntensityPolicy::Reject);
        ballast_config_destroy(h);
    }

    #[test]
    fn invalid_stride_leaves_config_unchanged() {
        let h = create();
        assert_eq!(
            ballast_config_set_page_stride(h, 0),
            BallastStatus::ConfigError as i32
        );
        assert_eq!(
            ballast_config_set_page_stride(h, 3000),
            BallastStatus::ConfigError as i32
        );
        assert_eq!(read(h).page_stride, BallastConfig::default().page_stride);
        ballast_config_destroy(h);
    }

    #[test]
    fn unknown_policy_is_invalid_argument() {
        let h = create();
        assert_eq!(
            ballast_config_set_intensity_policy(h, 9),
            BallastStatus::InvalidArgument as i32
        );
        ballast_config_destroy(h);
    }

    #[test]
    fn destroyed_handle_is_invalid() {
        let h = create();
        assert_eq!(ballast_config_destroy(h), BallastStatus::Ok as i32);
        assert_eq!(
            ballast_config_destroy(h),
            BallastStatus::InvalidHandle as i32
        );
        assert_eq!(
            ballast_config_set_touch_marker(h, 2),
            BallastStatus::InvalidHandle as i32
        );
    }
}

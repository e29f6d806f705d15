//! Benchmark profiles for the Ballast memory-pressure toolkit.
//!
//! - [`small_profile`]: 4 MiB at intensity 100, for tight iteration loops
//! - [`reference_profile`]: 64 MiB at intensity 100
//! - [`INTENSITY_SWEEP`]: intensities measured by the allocate benches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ballast_alloc::Holder;
use ballast_core::BallastConfig;

/// Intensities exercised by the sweep benchmarks.
pub const INTENSITY_SWEEP: [i32; 5] = [0, 1, 25, 50, 100];

/// 4 MiB block at full intensity, default stride.
pub fn small_profile() -> BallastConfig {
    BallastConfig::with_max_block_bytes(4 * 1024 * 1024)
}

/// 64 MiB block at full intensity, default stride.
pub fn reference_profile() -> BallastConfig {
    BallastConfig::with_max_block_bytes(64 * 1024 * 1024)
}

/// An empty holder for `config`.
///
/// # Panics
///
/// Panics if `config` fails validation.
pub fn holder(config: BallastConfig) -> Holder {
    Holder::with_config(config).expect("benchmark profile must validate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        assert!(small_profile().validate().is_ok());
        assert!(reference_profile().validate().is_ok());
    }

    #[test]
    fn small_profile_allocates_across_sweep() {
        let mut h = holder(small_profile());
        for intensity in INTENSITY_SWEEP {
            let bytes = h.allocate(intensity).unwrap();
            assert_eq!(bytes, 4 * 1024 * 1024 * intensity as usize / 100);
            assert!(h.verify_touched());
        }
    }
}

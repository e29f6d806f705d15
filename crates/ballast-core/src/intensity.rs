//! Intensity percentages and the arithmetic that turns them into block sizes.
//!
//! An intensity is a signed percentage of the configured maximum block.
//! The nominal range is `0..=100`; what happens outside it is decided by
//! the [`IntensityPolicy`].

use crate::error::BallastError;

/// Lowest nominal intensity.
pub const MIN_INTENSITY: i32 = 0;

/// Highest nominal intensity.
pub const MAX_INTENSITY: i32 = 100;

/// How intensities outside `0..=100` are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntensityPolicy {
    /// Clamp into `0..=100` before sizing.
    #[default]
    Clamp,
    /// Refuse the request. The currently held block is left in place.
    Reject,
    /// Scale the raw value. Negative results fail after the held block has
    /// been released; results above the maximum are attempted as-is.
    Unchecked,
}

impl IntensityPolicy {
    /// Map a raw intensity to the value used for sizing.
    ///
    /// Only [`Reject`](Self::Reject) can fail.
    pub fn apply(self, intensity: i32) -> Result<i32, BallastError> {
        match self {
            Self::Clamp => Ok(intensity.clamp(MIN_INTENSITY, MAX_INTENSITY)),
            Self::Reject if (MIN_INTENSITY..=MAX_INTENSITY).contains(&intensity) => Ok(intensity),
            Self::Reject => Err(BallastError::IntensityOutOfRange { intensity }),
            Self::Unchecked => Ok(intensity),
        }
    }
}

/// `intensity * max_block_bytes / 100`, truncated toward zero.
///
/// Computed in 128 bits so neither a large configured maximum nor an
/// unchecked intensity can overflow. The result may be negative.
pub fn scaled_bytes(intensity: i32, max_block_bytes: usize) -> i128 {
    i128::from(intensity) * max_block_bytes as i128 / i128::from(MAX_INTENSITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HALF_GIB: usize = 536_870_912;

    #[test]
    fn full_intensity_is_the_whole_block() {
        assert_eq!(scaled_bytes(100, HALF_GIB), 536_870_912);
    }

    #[test]
    fn half_intensity_is_half_the_block() {
        assert_eq!(scaled_bytes(50, HALF_GIB), 268_435_456);
    }

    #[test]
    fn zero_intensity_is_empty() {
        assert_eq!(scaled_bytes(0, HALF_GIB), 0);
    }

    #[test]
    fn division_truncates() {
        // 7 * 10 / 100 = 0.7
        assert_eq!(scaled_bytes(7, 10), 0);
        assert_eq!(scaled_bytes(33, 1000), 330);
    }

    #[test]
    fn negative_intensity_scales_negative() {
        assert_eq!(scaled_bytes(-10, HALF_GIB), -53_687_091);
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let v = scaled_bytes(i32::MAX, usize::MAX);
        assert!(v > 0);
        let v = scaled_bytes(i32::MIN, usize::MAX);
        assert!(v < 0);
    }

    #[test]
    fn clamp_policy() {
        assert_eq!(IntensityPolicy::Clamp.apply(-5), Ok(0));
        assert_eq!(IntensityPolicy::Clamp.apply(250), Ok(100));
        assert_eq!(IntensityPolicy::Clamp.apply(42), Ok(42));
    }

    #[test]
    fn reject_policy() {
        assert_eq!(IntensityPolicy::Reject.apply(0), Ok(0));
        assert_eq!(IntensityPolicy::Reject.apply(100), Ok(100));
        assert_eq!(
            IntensityPolicy::Reject.apply(101),
            Err(BallastError::IntensityOutOfRange { intensity: 101 })
        );
        assert_eq!(
            IntensityPolicy::Reject.apply(-1),
            Err(BallastError::IntensityOutOfRange { intensity: -1 })
        );
    }

    #[test]
    fn unchecked_policy_passes_through() {
        assert_eq!(IntensityPolicy::Unchecked.apply(-7), Ok(-7));
        assert_eq!(IntensityPolicy::Unchecked.apply(400), Ok(400));
    }

    #[test]
    fn default_policy_is_clamp() {
        assert_eq!(IntensityPolicy::default(), IntensityPolicy::Clamp);
    }

    proptest! {
        #[test]
        fn in_range_sizes_never_exceed_max(
            intensity in 0i32..=100,
            max in 0usize..(1usize << 40),
        ) {
            let bytes = scaled_bytes(intensity, max);
            prop_assert!(bytes >= 0);
            prop_assert!(bytes <= max as i128);
        }

        #[test]
        fn size_is_monotonic_in_intensity(a in 0i32..=100, b in 0i32..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scaled_bytes(lo, HALF_GIB) <= scaled_bytes(hi, HALF_GIB));
        }

        #[test]
        fn clamp_always_lands_in_range(intensity in any::<i32>()) {
            let v = IntensityPolicy::Clamp.apply(intensity).unwrap();
            prop_assert!((MIN_INTENSITY..=MAX_INTENSITY).contains(&v));
        }
    }
}

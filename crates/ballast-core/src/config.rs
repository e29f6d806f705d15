//! Holder configuration parameters.

use crate::error::{BallastError, ConfigError};
use crate::intensity::{scaled_bytes, IntensityPolicy};

/// Configuration for an allocation holder.
///
/// Validated when a holder is built; immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BallastConfig {
    /// Size of the block requested at intensity 100, in bytes.
    ///
    /// Default: 536_870_912 (512 MiB, a quarter of 2 GiB).
    pub max_block_bytes: usize,

    /// Distance between touched bytes, and the block alignment.
    ///
    /// Default: 4096. Must be a power of two no larger than
    /// [`MAX_PAGE_STRIDE`](Self::MAX_PAGE_STRIDE).
    pub page_stride: usize,

    /// Value written at every touched offset.
    ///
    /// Default: 1.
    pub touch_marker: u8,

    /// Treatment of intensities outside `0..=100`.
    pub intensity_policy: IntensityPolicy,
}

impl BallastConfig {
    /// Default maximum block: 25% of 2 GiB.
    pub const DEFAULT_MAX_BLOCK_BYTES: usize = 536_870_912;

    /// Default touch stride, one small page.
    pub const DEFAULT_PAGE_STRIDE: usize = 4096;

    /// Default touch marker.
    pub const DEFAULT_TOUCH_MARKER: u8 = 1;

    /// Largest accepted stride (1 GiB).
    pub const MAX_PAGE_STRIDE: usize = 1 << 30;

    /// Create a config with every parameter at its default.
    ///
    /// `const` so that process-wide holders can be built in a `static`.
    pub const fn new() -> Self {
        Self {
            max_block_bytes: Self::DEFAULT_MAX_BLOCK_BYTES,
            page_stride: Self::DEFAULT_PAGE_STRIDE,
            touch_marker: Self::DEFAULT_TOUCH_MARKER,
            intensity_policy: IntensityPolicy::Clamp,
        }
    }

    /// Same as [`new`](Self::new) but with a different maximum block.
    pub const fn with_max_block_bytes(max_block_bytes: usize) -> Self {
        let mut config = Self::new();
        config.max_block_bytes = max_block_bytes;
        config
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        if !self.page_stride.is_power_of_two() {
            return Err(ConfigError::StrideNotPowerOfTwo {
                stride: self.page_stride,
            });
        }
        if self.page_stride > Self::MAX_PAGE_STRIDE {
            return Err(ConfigError::StrideTooLarge {
                stride: self.page_stride,
            });
        }
        if self.max_block_bytes > isize::MAX as usize {
            return Err(ConfigError::MaxBlockTooLarge {
                bytes: self.max_block_bytes,
            });
        }
        Ok(())
    }

    /// Number of bytes an allocation request at `intensity` asks for.
    ///
    /// Applies the intensity policy, then scales. Sizes that are negative
    /// or exceed `isize::MAX` are [`BallastError::InvalidSize`].
    pub fn request_bytes(&self, intensity: i32) -> Result<usize, BallastError> {
        let effective = self.intensity_policy.apply(intensity)?;
        let bytes = scaled_bytes(effective, self.max_block_bytes);
        if bytes < 0 || bytes > isize::MAX as i128 {
            return Err(BallastError::InvalidSize { intensity });
        }
        Ok(bytes as usize)
    }
}

impl Default for BallastConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_sizing() {
        let config = BallastConfig::default();
        assert_eq!(config.max_block_bytes, 536_870_912);
        assert_eq!(config.page_stride, 4096);
        assert_eq!(config.touch_marker, 1);
        assert_eq!(config.intensity_policy, IntensityPolicy::Clamp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn request_bytes_at_reference_points() {
        let config = BallastConfig::new();
        assert_eq!(config.request_bytes(0), Ok(0));
        assert_eq!(config.request_bytes(50), Ok(268_435_456));
        assert_eq!(config.request_bytes(100), Ok(536_870_912));
    }

    #[test]
    fn clamp_caps_oversized_requests() {
        let config = BallastConfig::new();
        assert_eq!(config.request_bytes(1000), Ok(536_870_912));
        assert_eq!(config.request_bytes(-40), Ok(0));
    }

    #[test]
    fn unchecked_negative_is_invalid_size() {
        let config = BallastConfig {
            intensity_policy: IntensityPolicy::Unchecked,
            ..BallastConfig::new()
        };
        assert_eq!(
            config.request_bytes(-1),
            Err(BallastError::InvalidSize { intensity: -1 })
        );
    }

    #[test]
    fn unchecked_oversize_is_attempted() {
        let config = BallastConfig {
            intensity_policy: IntensityPolicy::Unchecked,
            ..BallastConfig::with_max_block_bytes(1000)
        };
        assert_eq!(config.request_bytes(250), Ok(2500));
    }

    #[test]
    fn unchecked_beyond_isize_is_invalid_size() {
        let config = BallastConfig {
            intensity_policy: IntensityPolicy::Unchecked,
            ..BallastConfig::with_max_block_bytes(isize::MAX as usize)
        };
        assert_eq!(
            config.request_bytes(200),
            Err(BallastError::InvalidSize { intensity: 200 })
        );
    }

    #[test]
    fn validate_rejects_bad_strides() {
        let mut config = BallastConfig::new();
        config.page_stride = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStride));
        config.page_stride = 3000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::StrideNotPowerOfTwo { stride: 3000 })
        );
        config.page_stride = 1 << 31;
        assert_eq!(
            config.validate(),
            Err(ConfigError::StrideTooLarge { stride: 1 << 31 })
        );
        config.page_stride = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_oversized_maximum() {
        let config = BallastConfig::with_max_block_bytes(usize::MAX);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaxBlockTooLarge { bytes: usize::MAX })
        );
    }
}

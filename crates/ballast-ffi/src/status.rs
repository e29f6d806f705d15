//! C-compatible status codes.
//!
//! [`BallastStatus`] is returned by every status-reporting entry point.
//! Conversions from [`BallastError`] and [`ConfigError`] are provided.

use ballast_core::{BallastError, ConfigError};

/// Status code returned by FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallastStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// A required pointer is null or an enum tag is unknown.
    InvalidArgument = -2,
    /// The system allocator refused the block.
    AllocationFailed = -3,
    /// Intensity outside `0..=100` under the reject policy.
    IntensityOutOfRange = -4,
    /// The intensity produced a negative or unrepresentable size.
    InvalidSize = -5,
    /// Configuration validation failed.
    ConfigError = -6,
    /// The session holds no block.
    NotHolding = -7,
    /// A touched page no longer carries the marker byte.
    VerifyFailed = -8,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -9,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&BallastError> for BallastStatus {
    fn from(e: &BallastError) -> Self {
        match e {
            BallastError::AllocationFailed { .. } => Self::AllocationFailed,
            BallastError::IntensityOutOfRange { .. } => Self::IntensityOutOfRange,
            BallastError::InvalidSize { .. } => Self::InvalidSize,
            BallastError::Poisoned => Self::InternalError,
        }
    }
}

impl From<&ConfigError> for BallastStatus {
    fn from(_e: &ConfigError) -> Self {
        Self::ConfigError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(BallastStatus::Ok as i32, 0);
        assert_eq!(BallastStatus::InvalidHandle as i32, -1);
        assert_eq!(BallastStatus::InvalidArgument as i32, -2);
        assert_eq!(BallastStatus::AllocationFailed as i32, -3);
        assert_eq!(BallastStatus::IntensityOutOfRange as i32, -4);
        assert_eq!(BallastStatus::InvalidSize as i32, -5);
        assert_eq!(BallastStatus::ConfigError as i32, -6);
        assert_eq!(BallastStatus::NotHolding as i32, -7);
        assert_eq!(BallastStatus::VerifyFailed as i32, -8);
        assert_eq!(BallastStatus::InternalError as i32, -9);
        assert_eq!(BallastStatus::Panicked as i32, -128);
    }

    #[test]
    fn ballast_error_to_status() {
        assert_eq!(
            BallastStatus::from(&BallastError::AllocationFailed { requested: 1 }),
            BallastStatus::AllocationFailed
        );
        assert_eq!(
            BallastStatus::from(&BallastError::IntensityOutOfRange { intensity: 101 }),
            BallastStatus::IntensityOutOfRange
        );
        assert_eq!(
            BallastStatus::from(&BallastError::InvalidSize { intensity: -1 }),
            BallastStatus::InvalidSize
        );
        assert_eq!(
            BallastStatus::from(&BallastError::Poisoned),
            BallastStatus::InternalError
        );
    }

    #[test]
    fn config_error_to_status() {
        assert_eq!(
            BallastStatus::from(&ConfigError::ZeroStride),
            BallastStatus::ConfigError
        );
        assert_eq!(
            BallastStatus::from(&ConfigError::StrideNotPowerOfTwo { stride: 3 }),
            BallastStatus::ConfigError
        );
    }
}

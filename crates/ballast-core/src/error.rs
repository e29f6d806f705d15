//! Error types for allocation requests and configuration validation.

use std::error::Error;
use std::fmt;

/// Errors returned by a ballast allocation request.
///
/// None of these are fatal: a failed request leaves the holder empty (or,
/// for [`IntensityOutOfRange`](Self::IntensityOutOfRange), untouched) and
/// the caller may retry with a different intensity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BallastError {
    /// The system allocator could not provide a block of the requested size.
    AllocationFailed {
        /// Number of bytes requested.
        requested: usize,
    },
    /// Intensity outside `0..=100` under [`IntensityPolicy::Reject`](crate::IntensityPolicy::Reject).
    IntensityOutOfRange {
        /// The rejected intensity.
        intensity: i32,
    },
    /// The intensity produced a negative or unrepresentable byte count.
    InvalidSize {
        /// The intensity that produced the size.
        intensity: i32,
    },
    /// The holder lock was poisoned by a panic in another thread.
    Poisoned,
}

impl fmt::Display for BallastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "allocation of {requested} bytes failed")
            }
            Self::IntensityOutOfRange { intensity } => {
                write!(f, "intensity {intensity} is outside 0..=100")
            }
            Self::InvalidSize { intensity } => {
                write!(
                    f,
                    "intensity {intensity} yields a negative or unrepresentable block size"
                )
            }
            Self::Poisoned => write!(f, "holder lock poisoned by an earlier panic"),
        }
    }
}

impl Error for BallastError {}

/// Errors detected by [`BallastConfig::validate()`](crate::BallastConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `page_stride` is zero.
    ZeroStride,
    /// `page_stride` is not a power of two.
    StrideNotPowerOfTwo {
        /// The configured stride.
        stride: usize,
    },
    /// `page_stride` exceeds [`BallastConfig::MAX_PAGE_STRIDE`](crate::BallastConfig::MAX_PAGE_STRIDE).
    StrideTooLarge {
        /// The configured stride.
        stride: usize,
    },
    /// `max_block_bytes` exceeds `isize::MAX`.
    MaxBlockTooLarge {
        /// The configured maximum.
        bytes: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroStride => write!(f, "page_stride must be at least 1"),
            Self::StrideNotPowerOfTwo { stride } => {
                write!(f, "page_stride {stride} is not a power of two")
            }
            Self::StrideTooLarge { stride } => {
                write!(f, "page_stride {stride} exceeds the 1 GiB maximum")
            }
            Self::MaxBlockTooLarge { bytes } => {
                write!(f, "max_block_bytes {bytes} exceeds isize::MAX")
            }
        }
    }
}

impl Error for ConfigError {}

//! C-compatible enums for intensity policy and holder state.

use ballast_alloc::HolderState;
use ballast_core::IntensityPolicy;

/// Handling of intensities outside `0..=100`, for
/// `ballast_config_set_intensity_policy`.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallastIntensityPolicy {
    /// Clamp into range.
    Clamp = 0,
    /// Refuse the request and keep the held block.
    Reject = 1,
    /// Scale the raw value.
    Unchecked = 2,
}

impl BallastIntensityPolicy {
    /// Parse a raw tag, returning `None` for unknown values.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Clamp),
            1 => Some(Self::Reject),
            2 => Some(Self::Unchecked),
            _ => None,
        }
    }
}

impl From<BallastIntensityPolicy> for IntensityPolicy {
    fn from(p: BallastIntensityPolicy) -> Self {
        match p {
            BallastIntensityPolicy::Clamp => IntensityPolicy::Clamp,
            BallastIntensityPolicy::Reject => IntensityPolicy::Reject,
            BallastIntensityPolicy::Unchecked => IntensityPolicy::Unchecked,
        }
    }
}

/// Whether a session currently owns a block.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallastHolderState {
    /// No block held.
    Empty = 0,
    /// A block is held and has been touched.
    Holding = 1,
}

impl From<HolderState> for BallastHolderState {
    fn from(s: HolderState) -> Self {
        match s {
            HolderState::Empty => Self::Empty,
            HolderState::Holding { .. } => Self::Holding,
        }
    }
}

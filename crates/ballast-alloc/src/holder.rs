//! The single-slot allocation holder.
//!
//! [`Holder`] tracks at most one outstanding [`Block`]. Every allocation
//! request releases the held block before asking for the new one, so two
//! blocks are never live at once and nothing leaks when a request fails.

use ballast_core::{BallastConfig, BallastError, ConfigError};

use crate::block::Block;

/// Observable state of a holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HolderState {
    /// No block is held.
    Empty,
    /// A block of `bytes` bytes is held (possibly zero).
    Holding {
        /// Size of the held block.
        bytes: usize,
    },
}

/// Cumulative counters for a holder's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HolderStats {
    /// Successful allocations.
    pub allocations: u64,
    /// Blocks released, whether explicitly or by a replacing allocation.
    pub releases: u64,
    /// Requests that ended in an error.
    pub failures: u64,
    /// Largest block ever held, in bytes.
    pub peak_bytes: usize,
}

impl HolderStats {
    const ZERO: Self = Self {
        allocations: 0,
        releases: 0,
        failures: 0,
        peak_bytes: 0,
    };
}

/// Owner of at most one ballast block.
///
/// Not synchronised: use [`SharedHolder`](crate::SharedHolder) when
/// several threads drive the same holder. Dropping the holder frees the
/// held block.
#[derive(Debug)]
pub struct Holder {
    config: BallastConfig,
    block: Option<Block>,
    stats: HolderStats,
}

impl Holder {
    /// An empty holder with the default configuration.
    pub const fn new() -> Self {
        Self {
            config: BallastConfig::new(),
            block: None,
            stats: HolderStats::ZERO,
        }
    }

    /// An empty holder with a validated custom configuration.
    pub fn with_config(config: BallastConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            block: None,
            stats: HolderStats::default(),
        })
    }

    /// The configuration this holder was built with.
    pub fn config(&self) -> &BallastConfig {
        &self.config
    }

    /// Replace the held block with one sized for `intensity`.
    ///
    /// Returns the size of the new block. On error the holder is empty,
    /// except for [`BallastError::IntensityOutOfRange`], which is raised
    /// before anything is released.
    pub fn allocate(&mut self, intensity: i32) -> Result<usize, BallastError> {
        let bytes = match self.config.request_bytes(intensity) {
            Ok(bytes) => bytes,
            Err(e @ BallastError::IntensityOutOfRange { .. }) => {
                self.stats.failures += 1;
                tracing::debug!(intensity, "ballast request rejected");
                return Err(e);
            }
            Err(e) => {
                self.release();
                self.stats.failures += 1;
                tracing::warn!(intensity, error = %e, "ballast request has no valid size");
                return Err(e);
            }
        };

        self.release();

        match Block::allocate(bytes, self.config.page_stride, self.config.touch_marker) {
            Ok(block) => {
                tracing::debug!(
                    intensity,
                    bytes,
                    pages = block.touched_pages(),
                    "ballast block committed"
                );
                self.stats.allocations += 1;
                self.stats.peak_bytes = self.stats.peak_bytes.max(bytes);
                self.block = Some(block);
                Ok(bytes)
            }
            Err(e) => {
                self.stats.failures += 1;
                tracing::warn!(intensity, bytes, "ballast allocation failed");
                Err(e)
            }
        }
    }

    /// Free the held block, if any. Returns whether something was freed.
    pub fn release(&mut self) -> bool {
        match self.block.take() {
            Some(block) => {
                tracing::debug!(bytes = block.len(), "ballast block released");
                self.stats.releases += 1;
                true
            }
            None => false,
        }
    }

    /// Current state.
    pub fn state(&self) -> HolderState {
        match &self.block {
            Some(block) => HolderState::Holding { bytes: block.len() },
            None => HolderState::Empty,
        }
    }

    /// Whether a block is held.
    pub fn is_holding(&self) -> bool {
        self.block.is_some()
    }

    /// Size of the held block, or 0 when empty.
    pub fn held_bytes(&self) -> usize {
        self.block.as_ref().map_or(0, Block::len)
    }

    /// The held block.
    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    /// Whether a block is held and all of its touched offsets read back
    /// the marker. `false` when empty.
    pub fn verify_touched(&self) -> bool {
        self.block.as_ref().is_some_and(Block::verify)
    }

    /// Lifetime counters.
    pub fn stats(&self) -> HolderStats {
        self.stats
    }
}

impl Default for Holder {
    fn default() -> Self {
        Self::new()
    }
}

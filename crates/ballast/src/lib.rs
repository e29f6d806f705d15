//! Ballast: generate memory pressure by holding a touched block sized from
//! an intensity percentage.
//!
//! This is the facade crate re-exporting the public API of the Ballast
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use ballast::prelude::*;
//!
//! let holder = SharedHolder::with_config(BallastConfig::with_max_block_bytes(1 << 20)).unwrap();
//!
//! // 25% of 1 MiB, every page written.
//! assert_eq!(holder.allocate(25).unwrap(), 1 << 18);
//! assert!(holder.verify_touched().unwrap());
//!
//! // A new request replaces the old block.
//! holder.allocate(50).unwrap();
//! assert_eq!(holder.state().unwrap(), HolderState::Holding { bytes: 1 << 19 });
//!
//! assert!(holder.release().unwrap());
//! assert_eq!(holder.state().unwrap(), HolderState::Empty);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ballast-core` | Configuration, intensity policy, errors |
//! | [`holder`] | `ballast-alloc` | Touched blocks and holders |
//! | [`probe`] | `ballast-probe` | Memory usage sampling and history |
//! | [`engine`] | `ballast-engine` | Combined RAM and CPU simulator |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Configuration, intensity policy, and error types (`ballast-core`).
pub use ballast_core as types;

/// Touched memory blocks and their holders (`ballast-alloc`).
///
/// [`holder::Holder`] for single-owner use, [`holder::SharedHolder`] for a
/// process-wide or cross-thread holder.
pub use ballast_alloc as holder;

/// Memory usage sampling (`ballast-probe`).
pub use ballast_probe as probe;

/// Resource simulator (`ballast-engine`).
///
/// [`engine::Simulator`] combines a memory holder with duty-cycle CPU load
/// and optional background usage monitoring.
pub use ballast_engine as engine;

/// Common imports.
///
/// ```rust
/// use ballast::prelude::*;
/// ```
pub mod prelude {
    pub use ballast_alloc::{Holder, HolderState, HolderStats, SharedHolder};
    pub use ballast_core::{BallastConfig, BallastError, IntensityPolicy};
    pub use ballast_engine::{Monitor, Simulator, SimulatorConfig, SimulatorError};
    pub use ballast_probe::{SystemSampler, UsageHistory, UsageSample};
}

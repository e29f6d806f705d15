//! Core types for the Ballast memory-pressure toolkit.
//!
//! Everything here is plain data and arithmetic: how an intensity
//! percentage maps to a block size, how a holder is configured, and the
//! error types shared by the allocating crates. No memory is allocated on
//! behalf of the caller in this crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod intensity;

pub use config::BallastConfig;
pub use error::{BallastError, ConfigError};
pub use intensity::{scaled_bytes, IntensityPolicy, MAX_INTENSITY, MIN_INTENSITY};

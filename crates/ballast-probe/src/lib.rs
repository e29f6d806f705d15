//! Memory usage sampling for Ballast simulations.
//!
//! Reads system-wide memory, this process's resident set, and the running
//! process count through `sysinfo`, turns them into [`UsageSample`]s, and
//! keeps a bounded [`UsageHistory`]. A [`SystemSampler`] reuses its backend
//! state across samples.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod history;
pub mod meminfo;
pub mod sample;
pub mod system;

pub use error::ProbeError;
pub use history::UsageHistory;
pub use meminfo::{resident_bytes, MemoryInfo};
pub use sample::{estimated_cpu_percent, UsageSample};
pub use system::SystemSampler;

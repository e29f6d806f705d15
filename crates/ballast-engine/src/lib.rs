//! Resource-pressure simulator for Ballast.
//!
//! [`Simulator`] drives two independent loads, each with its own
//! intensity percentage:
//!
//! - **RAM:** a [`Holder`](ballast_alloc::Holder) block sized from the RAM
//!   intensity, replaced whenever the intensity changes.
//! - **CPU:** a [`CpuLoad`] of duty-cycle worker threads.
//!
//! It also samples usage into a bounded history, either on demand or from
//! a background [`Monitor`] started with
//! [`Simulator::start_monitoring`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod cpu;
pub mod error;
pub mod monitor;
pub mod simulator;

pub use config::{ConfigError, SimulatorConfig};
pub use cpu::CpuLoad;
pub use error::SimulatorError;
pub use monitor::Monitor;
pub use simulator::Simulator;

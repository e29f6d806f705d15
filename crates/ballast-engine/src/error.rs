//! Simulator error type.

use std::error::Error;
use std::fmt;

use ballast_core::BallastError;
use ballast_probe::ProbeError;

use crate::config::ConfigError;

/// Errors returned by [`Simulator`](crate::Simulator) operations.
#[derive(Debug)]
pub enum SimulatorError {
    /// Configuration failed validation.
    Config(ConfigError),
    /// The memory ballast could not be applied.
    Ballast(BallastError),
    /// Usage sampling failed.
    Probe(ProbeError),
    /// A CPU worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Ballast(e) => write!(f, "ballast: {e}"),
            Self::Probe(e) => write!(f, "probe: {e}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for SimulatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Ballast(e) => Some(e),
            Self::Probe(e) => Some(e),
            Self::ThreadSpawnFailed { .. } => None,
        }
    }
}

impl From<ConfigError> for SimulatorError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<BallastError> for SimulatorError {
    fn from(e: BallastError) -> Self {
        Self::Ballast(e)
    }
}

impl From<ProbeError> for SimulatorError {
    fn from(e: ProbeError) -> Self {
        Self::Probe(e)
    }
}

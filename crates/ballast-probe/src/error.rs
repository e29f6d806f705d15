//! Probe error types.

use std::error::Error;
use std::fmt;

/// Errors raised while reading memory statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeError {
    /// The host OS is not supported by the system-information backend.
    Unsupported,
    /// The id of the current process could not be determined.
    CurrentPid {
        /// Backend-provided reason.
        reason: &'static str,
    },
    /// The process was not found after a refresh.
    ProcessNotFound {
        /// The process id that was looked up.
        pid: u32,
    },
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "memory statistics are not available on this platform"),
            Self::CurrentPid { reason } => write!(f, "cannot determine current pid: {reason}"),
            Self::ProcessNotFound { pid } => write!(f, "process {pid} not found"),
        }
    }
}

impl Error for ProbeError {}

//! Simulator configuration, validation, and error types.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use ballast_core::BallastConfig;
use ballast_probe::UsageHistory;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulatorConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The memory holder configuration is invalid.
    Ballast(ballast_core::ConfigError),
    /// `cpu_period` is zero.
    ZeroCpuPeriod,
    /// `history_capacity` is zero.
    ZeroHistoryCapacity,
    /// `max_cpu_threads` is `Some(0)`.
    ZeroCpuThreads,
    /// `monitor_interval` is zero.
    ZeroMonitorInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ballast(e) => write!(f, "ballast: {e}"),
            Self::ZeroCpuPeriod => write!(f, "cpu_period must be non-zero"),
            Self::ZeroHistoryCapacity => write!(f, "history_capacity must be at least 1"),
            Self::ZeroCpuThreads => write!(f, "max_cpu_threads must be at least 1"),
            Self::ZeroMonitorInterval => write!(f, "monitor_interval must be non-zero"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ballast(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ballast_core::ConfigError> for ConfigError {
    fn from(e: ballast_core::ConfigError) -> Self {
        Self::Ballast(e)
    }
}

// ── SimulatorConfig ────────────────────────────────────────────────

/// Complete configuration for a [`Simulator`](crate::Simulator).
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    /// Memory holder configuration.
    pub ballast: BallastConfig,
    /// Length of one CPU duty cycle. Default: 10ms.
    pub cpu_period: Duration,
    /// Upper bound on CPU worker threads. `None` = available parallelism.
    pub max_cpu_threads: Option<usize>,
    /// Number of usage samples retained. Default: 60.
    pub history_capacity: usize,
    /// CPU intensity before any call to `set_cpu_intensity`. Default: 50.
    pub initial_cpu_intensity: i32,
    /// RAM intensity before any call to `set_ram_intensity`. Default: 50.
    pub initial_ram_intensity: i32,
    /// Pause between background usage samples. Default: 1s.
    pub monitor_interval: Duration,
}

impl SimulatorConfig {
    /// Default CPU duty-cycle period.
    pub const DEFAULT_CPU_PERIOD: Duration = Duration::from_millis(10);

    /// Default pause between background usage samples.
    pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(1);

    /// Default starting intensity for both loads.
    pub const DEFAULT_INTENSITY: i32 = 50;

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ballast.validate()?;
        if self.cpu_period.is_zero() {
            return Err(ConfigError::ZeroCpuPeriod);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.max_cpu_threads == Some(0) {
            return Err(ConfigError::ZeroCpuThreads);
        }
        if self.monitor_interval.is_zero() {
            return Err(ConfigError::ZeroMonitorInterval);
        }
        Ok(())
    }

    /// Resolve the CPU thread ceiling, detecting it if unset.
    pub fn resolved_max_cpu_threads(&self) -> usize {
        match self.max_cpu_threads {
            Some(n) => n.max(1),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ballast: BallastConfig::default(),
            cpu_period: Self::DEFAULT_CPU_PERIOD,
            max_cpu_threads: None,
            history_capacity: UsageHistory::DEFAULT_CAPACITY,
            initial_cpu_intensity: Self::DEFAULT_INTENSITY,
            initial_ram_intensity: Self::DEFAULT_INTENSITY,
            monitor_interval: Self::DEFAULT_MONITOR_INTERVAL,
        }
    }
}

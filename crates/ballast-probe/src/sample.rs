//! A single point-in-time usage reading.

use crate::error::ProbeError;
use crate::meminfo::MemoryInfo;
use crate::system::SystemSampler;

/// Resource usage at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsageSample {
    /// Estimated CPU load caused by the simulation, percent.
    pub cpu_percent: f32,
    /// System memory in use, percent of total.
    pub ram_percent: f32,
    /// System memory available, bytes.
    pub available_bytes: u64,
    /// System memory total, bytes.
    pub total_bytes: u64,
    /// Resident set size of this process, bytes.
    pub resident_bytes: u64,
    /// Number of processes running on the host.
    pub running_processes: usize,
}

impl UsageSample {
    /// Combine memory figures with the CPU estimate for `cpu_intensity`.
    pub fn from_parts(
        info: MemoryInfo,
        resident_bytes: u64,
        running_processes: usize,
        cpu_intensity: i32,
    ) -> Self {
        Self {
            cpu_percent: estimated_cpu_percent(cpu_intensity),
            ram_percent: info.used_percent(),
            available_bytes: info.available_bytes,
            total_bytes: info.total_bytes,
            resident_bytes,
            running_processes,
        }
    }

    /// Take a live sample with a one-off [`SystemSampler`].
    ///
    /// Callers sampling repeatedly should keep a sampler instead.
    pub fn capture(cpu_intensity: i32) -> Result<Self, ProbeError> {
        SystemSampler::new().sample(cpu_intensity)
    }
}

/// CPU load expected from a duty-cycle load at `intensity` percent.
///
/// `0.9 * intensity - 20`, clamped to `0..=100`: below roughly 22% the
/// workers spend most of each period asleep and the load is negligible.
pub fn estimated_cpu_percent(intensity: i32) -> f32 {
    (intensity as f32 * 0.9 - 20.0).clamp(0.0, 100.0)
}

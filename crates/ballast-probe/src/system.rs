//! Live readings through `sysinfo`.
//!
//! A [`SystemSampler`] keeps one `sysinfo::System` so repeated samples only
//! refresh what they read: memory totals, and per-process memory for the
//! process count and this process's resident set.

use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::error::ProbeError;
use crate::meminfo::MemoryInfo;
use crate::sample::UsageSample;

/// Reusable reader of system and current-process memory figures.
#[derive(Debug)]
pub struct SystemSampler {
    system: System,
    pid: Result<Pid, &'static str>,
}

impl SystemSampler {
    /// A sampler for the current process. Nothing is read until asked.
    pub fn new() -> Self {
        Self::for_pid(sysinfo::get_current_pid())
    }

    fn for_pid(pid: Result<Pid, &'static str>) -> Self {
        Self {
            system: System::new(),
            pid,
        }
    }

    fn check_supported() -> Result<(), ProbeError> {
        if sysinfo::IS_SUPPORTED_SYSTEM {
            Ok(())
        } else {
            Err(ProbeError::Unsupported)
        }
    }

    fn pid(&self) -> Result<Pid, ProbeError> {
        self.pid.map_err(|reason| ProbeError::CurrentPid { reason })
    }

    /// Refresh and return system-wide memory figures.
    ///
    /// Platforms that report no available figure fall back to free memory.
    pub fn memory(&mut self) -> Result<MemoryInfo, ProbeError> {
        Self::check_supported()?;
        self.system.refresh_memory();
        let available = match self.system.available_memory() {
            0 => self.system.free_memory(),
            n => n,
        };
        Ok(MemoryInfo {
            total_bytes: self.system.total_memory(),
            available_bytes: available,
        })
    }

    /// Refresh and return the resident set of the current process.
    pub fn resident_bytes(&mut self) -> Result<u64, ProbeError> {
        Self::check_supported()?;
        let pid = self.pid()?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            false,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.own_memory(pid)
    }

    /// Refresh the process list and return how many processes are running.
    pub fn running_processes(&mut self) -> Result<usize, ProbeError> {
        Self::check_supported()?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        Ok(self.system.processes().len())
    }

    fn own_memory(&self, pid: Pid) -> Result<u64, ProbeError> {
        self.system
            .process(pid)
            .map(Process::memory)
            .ok_or(ProbeError::ProcessNotFound { pid: pid.as_u32() })
    }

    /// Take a full usage sample, estimating CPU load from `cpu_intensity`.
    pub fn sample(&mut self, cpu_intensity: i32) -> Result<UsageSample, ProbeError> {
        let info = self.memory()?;
        let pid = self.pid()?;
        // The full refresh also updates this process's memory.
        let running = self.running_processes()?;
        let resident = self.own_memory(pid)?;
        tracing::trace!(
            total = info.total_bytes,
            available = info.available_bytes,
            resident,
            running,
            "usage sampled"
        );
        Ok(UsageSample::from_parts(info, resident, running, cpu_intensity))
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pid_is_reported() {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return;
        }
        let mut sampler = SystemSampler::for_pid(Ok(Pid::from_u32(u32::MAX)));
        assert_eq!(
            sampler.resident_bytes(),
            Err(ProbeError::ProcessNotFound { pid: u32::MAX })
        );
    }

    #[test]
    fn pid_lookup_failure_is_reported() {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return;
        }
        let mut sampler = SystemSampler::for_pid(Err("no pid"));
        assert_eq!(
            sampler.resident_bytes(),
            Err(ProbeError::CurrentPid { reason: "no pid" })
        );
        assert!(sampler.memory().is_ok());
    }

    #[test]
    fn live_sample_counts_this_process() {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return;
        }
        let mut sampler = SystemSampler::new();
        let first = sampler.sample(50).unwrap();
        assert!(first.total_bytes > 0);
        assert!(first.resident_bytes > 0);
        assert!(first.running_processes >= 1);
        assert!((first.cpu_percent - 25.0).abs() < 1e-4);

        // A reused sampler keeps working.
        let second = sampler.sample(0).unwrap();
        assert_eq!(second.cpu_percent, 0.0);
        assert_eq!(second.total_bytes, first.total_bytes);
    }
}

//! The resource simulator.
//!
//! Owns the memory holder, the CPU load, and the usage history. While
//! stopped it only records intensities; `start()` applies both loads and
//! any later intensity change re-applies the affected one. An intensity is
//! stored only once its load has been applied.
//!
//! Background monitoring is independent of the loads: it can run while the
//! simulator is stopped, in which case samples report no CPU load.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ballast_alloc::{Holder, HolderState};
use ballast_probe::{estimated_cpu_percent, SystemSampler, UsageHistory, UsageSample};

use crate::config::SimulatorConfig;
use crate::cpu::CpuLoad;
use crate::error::SimulatorError;
use crate::monitor::Monitor;

/// Memory and CPU pressure generator with usage sampling.
///
/// Not synchronised; wrap in a mutex to drive it from several threads.
/// Dropping a simulator stops its loads and its monitor.
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    max_cpu_threads: usize,
    holder: Holder,
    cpu: Option<CpuLoad>,
    cpu_intensity: i32,
    ram_intensity: i32,
    running: bool,
    history: Arc<Mutex<UsageHistory>>,
    cpu_gauge: Arc<AtomicI32>,
    sampler: SystemSampler,
    monitor: Option<Monitor>,
}

impl Simulator {
    /// Build a stopped simulator.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        let holder = Holder::with_config(config.ballast)
            .map_err(|e| SimulatorError::Config(e.into()))?;
        Ok(Self {
            max_cpu_threads: config.resolved_max_cpu_threads(),
            holder,
            cpu: None,
            cpu_intensity: config.initial_cpu_intensity,
            ram_intensity: config.initial_ram_intensity,
            running: false,
            history: Arc::new(Mutex::new(UsageHistory::new(config.history_capacity))),
            cpu_gauge: Arc::new(AtomicI32::new(0)),
            sampler: SystemSampler::new(),
            monitor: None,
            config,
        })
    }

    /// Apply both loads at the current intensities.
    ///
    /// A no-op when already running. If either load fails to apply, the
    /// simulator is stopped again and the error returned.
    pub fn start(&mut self) -> Result<(), SimulatorError> {
        if self.running {
            return Ok(());
        }
        self.running = true;
        let applied = self
            .apply_cpu(self.cpu_intensity)
            .and_then(|()| self.apply_ram(self.ram_intensity));
        if let Err(e) = applied {
            self.stop();
            return Err(e);
        }
        self.publish_cpu_gauge();
        tracing::info!(
            cpu_intensity = self.cpu_intensity,
            ram_intensity = self.ram_intensity,
            "simulation started"
        );
        Ok(())
    }

    /// Stop CPU workers and release the memory block.
    ///
    /// Leaves background monitoring running.
    pub fn stop(&mut self) {
        let was_running = self.running;
        self.running = false;
        if let Some(cpu) = self.cpu.take() {
            cpu.stop();
        }
        self.holder.release();
        self.publish_cpu_gauge();
        if was_running {
            tracing::info!("simulation stopped");
        }
    }

    /// Set the CPU intensity, re-applying the load if running and changed.
    ///
    /// If the new load cannot be started the workers are gone and the
    /// previous intensity is kept, so repeating the call retries.
    pub fn set_cpu_intensity(&mut self, intensity: i32) -> Result<(), SimulatorError> {
        if self.running {
            if self.cpu_intensity == intensity && self.cpu.is_some() {
                return Ok(());
            }
            let applied = self.apply_cpu(intensity);
            self.publish_cpu_gauge();
            applied?;
        }
        self.cpu_intensity = intensity;
        Ok(())
    }

    /// Set the RAM intensity, re-applying the ballast if running and changed.
    ///
    /// A rejected intensity is not stored; the simulator keeps the last
    /// one that was applied.
    pub fn set_ram_intensity(&mut self, intensity: i32) -> Result<(), SimulatorError> {
        if self.running {
            if self.ram_intensity == intensity && self.holder.is_holding() {
                return Ok(());
            }
            self.apply_ram(intensity)?;
        }
        self.ram_intensity = intensity;
        Ok(())
    }

    /// Set both intensities at once.
    pub fn set_intensity(&mut self, intensity: i32) -> Result<(), SimulatorError> {
        self.set_cpu_intensity(intensity)?;
        self.set_ram_intensity(intensity)
    }

    fn apply_cpu(&mut self, intensity: i32) -> Result<(), SimulatorError> {
        if let Some(old) = self.cpu.take() {
            old.stop();
        }
        let load = CpuLoad::start(intensity, self.max_cpu_threads, self.config.cpu_period)?;
        self.cpu = Some(load);
        Ok(())
    }

    fn apply_ram(&mut self, intensity: i32) -> Result<(), SimulatorError> {
        self.holder.allocate(intensity)?;
        Ok(())
    }

    fn publish_cpu_gauge(&self) {
        self.cpu_gauge
            .store(self.active_cpu_intensity(), Ordering::Relaxed);
    }

    /// Sample usage every `monitor_interval` on a background thread.
    ///
    /// Each sample is appended to the history and then passed to
    /// `on_sample` on the monitor thread. A monitor that is already
    /// running is replaced.
    pub fn start_monitoring<F>(&mut self, on_sample: F) -> Result<(), SimulatorError>
    where
        F: FnMut(&UsageSample) + Send + 'static,
    {
        self.stop_monitoring();
        let monitor = Monitor::start(
            self.config.monitor_interval,
            Arc::clone(&self.cpu_gauge),
            Arc::clone(&self.history),
            on_sample,
        )?;
        self.monitor = Some(monitor);
        Ok(())
    }

    /// Stop background sampling. Returns whether a monitor was running.
    pub fn stop_monitoring(&mut self) -> bool {
        match self.monitor.take() {
            Some(monitor) => {
                monitor.stop();
                true
            }
            None => false,
        }
    }

    /// Whether background sampling is active.
    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_some()
    }

    /// Capture a live usage sample and append it to the history.
    pub fn sample(&mut self) -> Result<UsageSample, SimulatorError> {
        let sample = self.sampler.sample(self.active_cpu_intensity())?;
        self.record(sample);
        Ok(sample)
    }

    /// Append an externally measured sample to the history.
    pub fn record(&mut self, sample: UsageSample) {
        self.lock_history().push(sample);
    }

    fn lock_history(&self) -> MutexGuard<'_, UsageHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Estimated CPU load from the running workers, percent.
    pub fn estimated_cpu_percent(&self) -> f32 {
        estimated_cpu_percent(self.active_cpu_intensity())
    }

    fn active_cpu_intensity(&self) -> i32 {
        match &self.cpu {
            Some(load) if self.running => load.intensity(),
            _ => 0,
        }
    }

    /// A snapshot of the retained samples.
    ///
    /// The monitor keeps appending after the snapshot is taken.
    pub fn history(&self) -> UsageHistory {
        self.lock_history().clone()
    }

    /// Whether the loads are applied.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current CPU intensity.
    pub fn cpu_intensity(&self) -> i32 {
        self.cpu_intensity
    }

    /// Current RAM intensity.
    pub fn ram_intensity(&self) -> i32 {
        self.ram_intensity
    }

    /// Number of live CPU workers.
    pub fn cpu_workers(&self) -> usize {
        self.cpu.as_ref().map_or(0, CpuLoad::worker_count)
    }

    /// State of the memory holder.
    pub fn ram_state(&self) -> HolderState {
        self.holder.state()
    }

    /// The memory holder.
    pub fn holder(&self) -> &Holder {
        &self.holder
    }

    /// The configuration this simulator was built with.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop_monitoring();
        self.stop();
    }
}

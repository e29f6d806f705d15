//! Duty-cycle CPU load.
//!
//! Each worker repeats a fixed period: spin for `intensity%` of it, then
//! wait out the rest on a crossbeam stop channel. Dropping the sender
//! disconnects the channel, which every worker observes within one period.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::SimulatorError;

/// A running set of CPU load workers. Stops and joins them on drop.
#[derive(Debug)]
pub struct CpuLoad {
    stop_tx: Option<Sender<()>>,
    workers: Vec<JoinHandle<()>>,
    intensity: i32,
}

impl CpuLoad {
    /// Number of workers for `intensity` given `max_threads` cores.
    ///
    /// `intensity * max_threads / 100` with the intensity clamped to
    /// `0..=100`.
    pub fn thread_count(intensity: i32, max_threads: usize) -> usize {
        let intensity = intensity.clamp(0, 100) as usize;
        (intensity * max_threads / 100).min(max_threads)
    }

    /// Split `period` into `(busy, idle)` for `intensity`.
    pub fn duty_cycle(intensity: i32, period: Duration) -> (Duration, Duration) {
        let intensity = intensity.clamp(0, 100) as u32;
        let busy = period * intensity / 100;
        (busy, period - busy)
    }

    /// Spawn the workers for `intensity`.
    ///
    /// Zero workers is a valid, idle load. If a spawn fails, the workers
    /// already started are stopped before the error is returned.
    pub fn start(
        intensity: i32,
        max_threads: usize,
        period: Duration,
    ) -> Result<Self, SimulatorError> {
        let count = Self::thread_count(intensity, max_threads);
        let (busy, idle) = Self::duty_cycle(intensity, period);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);

        let mut load = Self {
            stop_tx: Some(stop_tx),
            workers: Vec::with_capacity(count),
            intensity,
        };
        for i in 0..count {
            let rx = stop_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("ballast-cpu-{i}"))
                .spawn(move || run_worker(&rx, busy, idle))
                .map_err(|e| SimulatorError::ThreadSpawnFailed {
                    reason: e.to_string(),
                })?;
            load.workers.push(handle);
        }

        tracing::debug!(intensity, workers = count, ?busy, ?idle, "cpu load started");
        Ok(load)
    }

    /// Intensity the load was started with.
    pub fn intensity(&self) -> i32 {
        self.intensity
    }

    /// Number of live workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop every worker and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.stop_tx.take().is_none() {
            return;
        }
        let n = self.workers.len();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        tracing::debug!(workers = n, "cpu load stopped");
    }
}

impl Drop for CpuLoad {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(stop_rx: &Receiver<()>, busy: Duration, idle: Duration) {
    loop {
        let started = Instant::now();
        while started.elapsed() < busy {
            std::hint::spin_loop();
        }
        match stop_rx.recv_timeout(idle) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(2);

    #[test]
    fn thread_count_formula() {
        assert_eq!(CpuLoad::thread_count(0, 8), 0);
        assert_eq!(CpuLoad::thread_count(50, 8), 4);
        assert_eq!(CpuLoad::thread_count(99, 8), 7);
        assert_eq!(CpuLoad::thread_count(100, 8), 8);
        assert_eq!(CpuLoad::thread_count(250, 8), 8);
        assert_eq!(CpuLoad::thread_count(-10, 8), 0);
    }

    #[test]
    fn duty_cycle_splits_the_period() {
        let period = Duration::from_millis(10);
        assert_eq!(
            CpuLoad::duty_cycle(30, period),
            (Duration::from_millis(3), Duration::from_millis(7))
        );
        assert_eq!(CpuLoad::duty_cycle(100, period), (period, Duration::ZERO));
        assert_eq!(CpuLoad::duty_cycle(0, period), (Duration::ZERO, period));
    }

    #[test]
    fn start_spawns_and_stop_joins() {
        let load = CpuLoad::start(50, 4, PERIOD).unwrap();
        assert_eq!(load.worker_count(), 2);
        assert_eq!(load.intensity(), 50);
        load.stop();
    }

    #[test]
    fn full_intensity_still_stops() {
        let load = CpuLoad::start(100, 2, PERIOD).unwrap();
        assert_eq!(load.worker_count(), 2);
        drop(load);
    }

    #[test]
    fn zero_intensity_spawns_nothing() {
        let load = CpuLoad::start(0, 4, PERIOD).unwrap();
        assert_eq!(load.worker_count(), 0);
    }

    proptest::proptest! {
        #[test]
        fn thread_count_is_bounded_and_monotonic(
            a in proptest::prelude::any::<i32>(),
            b in proptest::prelude::any::<i32>(),
            max in 1usize..64,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (n_lo, n_hi) = (CpuLoad::thread_count(lo, max), CpuLoad::thread_count(hi, max));
            proptest::prop_assert!(n_hi <= max);
            proptest::prop_assert!(n_lo <= n_hi);
            if hi >= 100 {
                proptest::prop_assert_eq!(n_hi, max);
            }
        }

        #[test]
        fn duty_cycle_covers_the_period(
            intensity in proptest::prelude::any::<i32>(),
            millis in 1u64..1_000,
        ) {
            let period = Duration::from_millis(millis);
            let (busy, idle) = CpuLoad::duty_cycle(intensity, period);
            proptest::prop_assert_eq!(busy + idle, period);
            if intensity <= 0 {
                proptest::prop_assert_eq!(busy, Duration::ZERO);
            }
            if intensity >= 100 {
                proptest::prop_assert_eq!(idle, Duration::ZERO);
            }
        }
    }
}

//! Background usage monitor.
//!
//! One worker thread samples usage immediately and then once per interval,
//! appends each sample to the shared history, and hands it to a callback.
//! The CPU estimate reads the simulator's active CPU intensity from an
//! atomic gauge. Stopping works like [`CpuLoad`](crate::CpuLoad): dropping
//! the stop sender wakes the worker out of `recv_timeout`.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ballast_probe::{SystemSampler, UsageHistory, UsageSample};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::SimulatorError;

/// A running monitor worker. Stops and joins it on drop.
#[derive(Debug)]
pub struct Monitor {
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Monitor {
    /// Spawn the worker.
    ///
    /// `on_sample` runs on the worker thread after each sample has been
    /// recorded in `history`.
    pub fn start<F>(
        interval: Duration,
        cpu_gauge: Arc<AtomicI32>,
        history: Arc<Mutex<UsageHistory>>,
        on_sample: F,
    ) -> Result<Self, SimulatorError>
    where
        F: FnMut(&UsageSample) + Send + 'static,
    {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let worker = thread::Builder::new()
            .name("ballast-monitor".into())
            .spawn(move || run_monitor(&stop_rx, interval, &cpu_gauge, &history, on_sample))
            .map_err(|e| SimulatorError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
        tracing::debug!(?interval, "usage monitor started");
        Ok(Self {
            stop_tx: Some(stop_tx),
            worker: Some(worker),
            interval,
        })
    }

    /// Pause between samples.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the worker and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.stop_tx.take().is_none() {
            return;
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("usage monitor callback panicked");
            }
        }
        tracing::debug!("usage monitor stopped");
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_monitor<F>(
    stop_rx: &Receiver<()>,
    interval: Duration,
    cpu_gauge: &AtomicI32,
    history: &Mutex<UsageHistory>,
    mut on_sample: F,
) where
    F: FnMut(&UsageSample),
{
    let mut sampler = SystemSampler::new();
    loop {
        match sampler.sample(cpu_gauge.load(Ordering::Relaxed)) {
            Ok(sample) => {
                history
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(sample);
                on_sample(&sample);
            }
            Err(e) => tracing::debug!(error = %e, "usage sample skipped"),
        }
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(capacity: usize) -> (Arc<AtomicI32>, Arc<Mutex<UsageHistory>>) {
        (
            Arc::new(AtomicI32::new(100)),
            Arc::new(Mutex::new(UsageHistory::new(capacity))),
        )
    }

    #[test]
    fn samples_reach_history_and_callback() {
        if !sysinfo_supported() {
            return;
        }
        let (gauge, history) = shared(8);
        let (tx, rx) = crossbeam_channel::unbounded();
        let monitor = Monitor::start(
            Duration::from_millis(5),
            gauge,
            Arc::clone(&history),
            move |s: &UsageSample| {
                let _ = tx.send(*s);
            },
        )
        .unwrap();

        for _ in 0..3 {
            let s = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert!((s.cpu_percent - 70.0).abs() < 1e-4);
            assert!(s.total_bytes > 0);
        }
        monitor.stop();
        let len = history.lock().unwrap().len();
        assert!(len >= 3);
        assert!(len <= 8);
    }

    #[test]
    fn stop_interrupts_a_long_interval() {
        let (gauge, history) = shared(4);
        let (tx, rx) = crossbeam_channel::unbounded();
        let monitor = Monitor::start(
            Duration::from_secs(3600),
            gauge,
            history,
            move |_: &UsageSample| {
                let _ = tx.send(());
            },
        )
        .unwrap();
        assert_eq!(monitor.interval(), Duration::from_secs(3600));
        let started = std::time::Instant::now();
        drop(monitor);
        assert!(started.elapsed() < Duration::from_secs(60));
        // At most the immediate first sample was delivered.
        let _ = rx.try_recv();
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    fn sysinfo_supported() -> bool {
        ballast_probe::SystemSampler::new().memory().is_ok()
    }
}

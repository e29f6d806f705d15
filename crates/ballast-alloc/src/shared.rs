//! Thread-safe holder.
//!
//! [`SharedHolder`] wraps a [`Holder`] in a mutex held across the whole
//! release-then-allocate sequence. Two threads can therefore never free the
//! same block or both install a new one.

use std::sync::{Mutex, MutexGuard};

use ballast_core::{BallastConfig, BallastError, ConfigError};

use crate::holder::{Holder, HolderState, HolderStats};

/// A [`Holder`] behind a mutex.
///
/// `const`-constructible, so a process-wide instance can live in a
/// `static`. A lock poisoned by a panicking closure passed to
/// [`with`](Self::with) makes every later call return
/// [`BallastError::Poisoned`].
#[derive(Debug)]
pub struct SharedHolder {
    inner: Mutex<Holder>,
}

impl SharedHolder {
    /// An empty shared holder with the default configuration.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Holder::new()),
        }
    }

    /// An empty shared holder with a validated custom configuration.
    pub fn with_config(config: BallastConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Mutex::new(Holder::with_config(config)?),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Holder>, BallastError> {
        self.inner.lock().map_err(|_| BallastError::Poisoned)
    }

    /// See [`Holder::allocate`].
    pub fn allocate(&self, intensity: i32) -> Result<usize, BallastError> {
        self.lock()?.allocate(intensity)
    }

    /// See [`Holder::release`].
    pub fn release(&self) -> Result<bool, BallastError> {
        Ok(self.lock()?.release())
    }

    /// See [`Holder::state`].
    pub fn state(&self) -> Result<HolderState, BallastError> {
        Ok(self.lock()?.state())
    }

    /// See [`Holder::stats`].
    pub fn stats(&self) -> Result<HolderStats, BallastError> {
        Ok(self.lock()?.stats())
    }

    /// See [`Holder::verify_touched`].
    pub fn verify_touched(&self) -> Result<bool, BallastError> {
        Ok(self.lock()?.verify_touched())
    }

    /// Run `f` with exclusive access to the holder.
    pub fn with<R>(&self, f: impl FnOnce(&mut Holder) -> R) -> Result<R, BallastError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// Consume the wrapper and return the holder.
    pub fn into_inner(self) -> Result<Holder, BallastError> {
        self.inner.into_inner().map_err(|_| BallastError::Poisoned)
    }
}

impl Default for SharedHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Holder> for SharedHolder {
    fn from(holder: Holder) -> Self {
        Self {
            inner: Mutex::new(holder),
        }
    }
}

//! System-wide memory figures.

use crate::error::ProbeError;
use crate::system::SystemSampler;

/// System-wide memory figures, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Total usable RAM.
    pub total_bytes: u64,
    /// Memory available for new allocations without swapping.
    pub available_bytes: u64,
}

impl MemoryInfo {
    /// Read the live figures with a one-off [`SystemSampler`].
    pub fn read() -> Result<Self, ProbeError> {
        SystemSampler::new().memory()
    }

    /// Bytes in use: `total - available`, saturating.
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }

    /// Used memory as a percentage of total, clamped to `0..=100`.
    ///
    /// Zero when the total is zero.
    pub fn used_percent(&self) -> f32 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.used_bytes() as f64 / self.total_bytes as f64 * 100.0).clamp(0.0, 100.0) as f32
    }
}

/// Resident set size of the current process, in bytes.
pub fn resident_bytes() -> Result<u64, ProbeError> {
    SystemSampler::new().resident_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_percent_of_half_available() {
        let info = MemoryInfo {
            total_bytes: 8_048_576 * 1024,
            available_bytes: 4_024_288 * 1024,
        };
        assert_eq!(info.used_bytes(), 4_024_288 * 1024);
        assert!((info.used_percent() - 50.0).abs() < 0.01);
    }

    #[test]
    fn used_percent_with_zero_total() {
        let info = MemoryInfo {
            total_bytes: 0,
            available_bytes: 0,
        };
        assert_eq!(info.used_percent(), 0.0);
    }

    #[test]
    fn available_above_total_saturates() {
        let info = MemoryInfo {
            total_bytes: 10,
            available_bytes: 20,
        };
        assert_eq!(info.used_bytes(), 0);
        assert_eq!(info.used_percent(), 0.0);
    }

    #[test]
    fn live_figures_are_readable() {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return;
        }
        let info = MemoryInfo::read().unwrap();
        assert!(info.total_bytes > 0);
        assert!(info.available_bytes <= info.total_bytes);
        assert!(resident_bytes().unwrap() > 0);
    }
}

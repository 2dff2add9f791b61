// Service Counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-lifetime counters. A restart starts from zero; the counters are
/// advisory, so increments use relaxed ordering.
#[derive(Debug, Default)]
pub struct ServiceStats {
    uploaded: AtomicU64,
    errors: AtomicU64,
}

impl ServiceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an accepted upload.
    pub fn record_upload(&self) {
        self.uploaded.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed conversion.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uploaded_count: self.uploaded.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub uploaded_count: u64,
    pub errors: u64,
}

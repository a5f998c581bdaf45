use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

/// Counters for one converter.
///
/// Updated with relaxed ordering from `&self`; the numbers are only read for
/// the summary logged at the end of a run, so no cross-counter consistency is
/// needed.
#[derive(Debug, Default)]
pub struct ConversionMetrics {
    lines: AtomicU64,
    requests: AtomicU64,
    failures: AtomicU64,
}

/// Plain copy of [`ConversionMetrics`] at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Every line that went through `convert`.
    pub lines: u64,
    /// Lines enriched with request fields.
    pub requests: u64,
    /// Lines that matched the access-log shape but could not be extracted.
    pub failures: u64,
}

impl ConversionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_line(&self) {
        self.lines.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines: self.lines.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

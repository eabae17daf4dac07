//! Lookup metrics for the translation store.
//!
//! Tracks how often `t()` resolved a key in the active language, had to fall
//! back to the fallback language, or found nothing at all.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by a [`Translator`](crate::i18n::Translator).
///
/// Counters are atomics so that lookups can stay `&self`.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Key found in the active language
    hits: AtomicUsize,

    /// Key found only in the fallback language
    fallbacks: AtomicUsize,

    /// Key found nowhere; the key itself was displayed
    misses: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let misses = self.misses();
        let total = hits + fallbacks + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            fallbacks,
            misses,
            hit_rate,
        }
    }
}

/// Snapshot of lookup metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub fallbacks: usize,
    pub misses: usize,
    /// Percentage of lookups answered by the active language
    pub hit_rate: f64,
}

impl MetricsReport {
    /// Format the report as a one-line log message.
    pub fn format_summary(&self) -> String {
        format!(
            "Translation lookups: {} direct, {} fallback, {} missing ({:.1}% direct)",
            self.hits, self.fallbacks, self.misses, self.hit_rate
        )
    }
}

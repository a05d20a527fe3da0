// src/scan/stats.rs
// =============================================================================
// This module keeps the running session statistics.
//
// Invariant: total_scans == safe_urls + phishing_urls after every update.
// Counters only ever go up; there is no decrement anywhere (clearing the
// history does NOT touch these numbers).
//
// At startup the counters can be seeded from the fetched history, so the
// session view starts as a projection of the last few recorded scans
// instead of a wall of zeros.
// =============================================================================

use std::sync::Mutex;

use serde::Serialize;

use super::history::ScanRecord;

// The snapshot handed to renderers. Plain copyable data: callers can't
// reach back and mutate the live counters through it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_scans: u64,
    pub safe_urls: u64,
    pub phishing_urls: u64,
}

/// Monotonic counters for the current session.
#[derive(Debug, Default)]
pub struct StatsCounter {
    inner: Mutex<Statistics>,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed scan and returns the updated snapshot.
    /// Exactly one of the two verdict counters moves per call.
    pub fn record(&self, is_phishing: bool) -> Statistics {
        let mut stats = self.inner.lock().unwrap();
        stats.total_scans += 1;
        if is_phishing {
            stats.phishing_urls += 1;
        } else {
            stats.safe_urls += 1;
        }
        *stats
    }

    pub fn snapshot(&self) -> Statistics {
        *self.inner.lock().unwrap()
    }

    /// Derives the session baseline from records fetched at startup.
    pub fn seed_from(&self, records: &[ScanRecord]) -> Statistics {
        let phishing = records.iter().filter(|r| r.is_phishing).count() as u64;
        let seeded = Statistics {
            total_scans: records.len() as u64,
            safe_urls: records.len() as u64 - phishing,
            phishing_urls: phishing,
        };

        let mut stats = self.inner.lock().unwrap();
        *stats = seeded;
        *stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_phishing: bool) -> ScanRecord {
        ScanRecord {
            url: "https://example.com".to_string(),
            is_phishing,
            timestamp: "2026-08-04T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_record_moves_exactly_one_verdict_counter() {
        let counter = StatsCounter::new();

        let after_safe = counter.record(false);
        assert_eq!(after_safe.total_scans, 1);
        assert_eq!(after_safe.safe_urls, 1);
        assert_eq!(after_safe.phishing_urls, 0);

        let after_phishing = counter.record(true);
        assert_eq!(after_phishing.total_scans, 2);
        assert_eq!(after_phishing.safe_urls, 1);
        assert_eq!(after_phishing.phishing_urls, 1);
    }

    #[test]
    fn test_sum_invariant_over_sequence() {
        let counter = StatsCounter::new();
        let verdicts = [true, false, false, true, true, false, false, false];

        for &v in &verdicts {
            let stats = counter.record(v);
            assert_eq!(stats.total_scans, stats.safe_urls + stats.phishing_urls);
        }

        let stats = counter.snapshot();
        assert_eq!(stats.total_scans, verdicts.len() as u64);
        assert_eq!(stats.phishing_urls, 3);
        assert_eq!(stats.safe_urls, 5);
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let counter = StatsCounter::new();
        let before = counter.snapshot();
        counter.record(true);
        // The earlier snapshot did not move with the counter
        assert_eq!(before.total_scans, 0);
        assert_eq!(counter.snapshot().total_scans, 1);
    }

    #[test]
    fn test_seed_from_history() {
        let counter = StatsCounter::new();
        let records = vec![record(true), record(false), record(false), record(true)];

        let seeded = counter.seed_from(&records);
        assert_eq!(seeded.total_scans, 4);
        assert_eq!(seeded.safe_urls, 2);
        assert_eq!(seeded.phishing_urls, 2);
        assert_eq!(seeded.total_scans, seeded.safe_urls + seeded.phishing_urls);

        // Later scans keep counting on top of the baseline
        let after = counter.record(false);
        assert_eq!(after.total_scans, 5);
        assert_eq!(after.safe_urls, 3);
    }
}

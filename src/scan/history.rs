// src/scan/history.rs
// =============================================================================
// This module owns the bounded recent-activity buffer.
//
// Semantics:
// - Newest entry first; display order IS recency order
// - Capacity is fixed at 10; pushing an 11th entry drops the oldest
// - Records are immutable once inserted
//
// The buffer can also be seeded from the service's history endpoint at
// startup; replace() reorders to newest-first in case the service ever
// returns records in a different order.
//
// Rust concepts:
// - Interior mutability: Mutex lets the controller share &self references
// - Snapshots: Callers get owned Vec clones, never a live reference into
//   the buffer, so they can't mutate it behind our back
// =============================================================================

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// How many scans the recent-activity list keeps.
pub const HISTORY_CAPACITY: usize = 10;

// One classification outcome: what was checked, the verdict, and when.
//
// Field names serialize camelCase to match the service wire format
// ({"url": ..., "isPhishing": ..., "timestamp": ...}).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub url: String,
    pub is_phishing: bool,
    /// RFC 3339 UTC timestamp, e.g. "2026-08-04T12:30:00Z"
    pub timestamp: String,
}

/// Current time as the RFC 3339 string stored in scan records.
pub(crate) fn now_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

// Parses a record timestamp for ordering; unparsable values sort oldest.
fn parse_timestamp(raw: &str) -> OffsetDateTime {
    OffsetDateTime::parse(raw, &Rfc3339).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// The bounded, newest-first buffer of scan outcomes.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: Mutex<Vec<ScanRecord>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record at the front and returns the buffer after insertion.
    /// If the buffer would exceed capacity, the oldest entry is dropped.
    pub fn push(&self, record: ScanRecord) -> Vec<ScanRecord> {
        let mut records = self.records.lock().unwrap();
        records.insert(0, record);
        records.truncate(HISTORY_CAPACITY);
        records.clone()
    }

    /// A snapshot of the buffer, newest first. Side-effect free: calling
    /// this repeatedly without an intervening push returns the same list.
    pub fn current(&self) -> Vec<ScanRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Replaces the buffer with records fetched from the service.
    /// The service's ordering is not trusted: entries are reordered
    /// newest-first here, then truncated to capacity.
    pub fn replace(&self, mut incoming: Vec<ScanRecord>) -> Vec<ScanRecord> {
        incoming.sort_by_key(|record| std::cmp::Reverse(parse_timestamp(&record.timestamp)));
        incoming.truncate(HISTORY_CAPACITY);

        let mut records = self.records.lock().unwrap();
        *records = incoming;
        records.clone()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, minute: u8) -> ScanRecord {
        ScanRecord {
            url: url.to_string(),
            is_phishing: false,
            timestamp: format!("2026-08-04T10:{:02}:00Z", minute),
        }
    }

    #[test]
    fn test_push_inserts_at_front() {
        let store = HistoryStore::new();
        store.push(record("https://first.com", 1));
        let after = store.push(record("https://second.com", 2));

        assert_eq!(after[0].url, "https://second.com");
        assert_eq!(after[1].url, "https://first.com");
    }

    #[test]
    fn test_eleventh_push_evicts_oldest() {
        let store = HistoryStore::new();
        for i in 0..11 {
            store.push(record(&format!("https://site{}.com", i), i as u8));
        }

        let current = store.current();
        assert_eq!(current.len(), HISTORY_CAPACITY);
        // The newest 10 survive, newest first
        assert_eq!(current[0].url, "https://site10.com");
        assert_eq!(current[9].url, "https://site1.com");
        // The very first push is gone
        assert!(!current.iter().any(|r| r.url == "https://site0.com"));
    }

    #[test]
    fn test_current_is_stable_between_pushes() {
        let store = HistoryStore::new();
        store.push(record("https://a.com", 1));

        let first = store.current();
        let second = store.current();
        assert_eq!(first, second);
    }

    #[test]
    fn test_replace_reorders_newest_first_and_truncates() {
        let store = HistoryStore::new();

        // 12 records, deliberately out of order
        let mut incoming: Vec<ScanRecord> = (0..12)
            .map(|i| record(&format!("https://site{}.com", i), i as u8))
            .collect();
        incoming.swap(0, 11);
        incoming.swap(3, 7);

        let seeded = store.replace(incoming);
        assert_eq!(seeded.len(), HISTORY_CAPACITY);
        assert_eq!(seeded[0].url, "https://site11.com");
        // The two oldest of the twelve fell off
        assert!(!seeded.iter().any(|r| r.url == "https://site0.com"));
        assert!(!seeded.iter().any(|r| r.url == "https://site1.com"));
    }

    #[test]
    fn test_clear_empties_buffer() {
        let store = HistoryStore::new();
        store.push(record("https://a.com", 1));
        assert!(!store.current().is_empty());

        store.clear();
        assert!(store.current().is_empty());
    }

    #[test]
    fn test_record_wire_format() {
        let rec = record("https://example.com", 0);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["isPhishing"], false);
        assert!(json["timestamp"].is_string());
    }
}

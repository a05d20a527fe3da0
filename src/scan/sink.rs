// src/scan/sink.rs
// =============================================================================
// The rendering boundary of the scan core.
//
// The controller never prints, draws, or touches a terminal. Every visible
// consequence of the state machine flows through this trait, so the core
// can be exercised in tests with a recording fake, and the binary plugs in
// a terminal implementation.
//
// Ordering matters for two calls: history_refreshed and stats_updated are
// always delivered before verdict_rendered for the same scan, so a renderer
// can never show a verdict next to stale counters.
// =============================================================================

use crate::api::ServiceStats;

use super::controller::ScanOutcome;
use super::history::ScanRecord;
use super::notify::NoticeKind;
use super::stats::Statistics;

pub trait UiSink: Send + Sync {
    /// The input field and trigger control were disabled (true) or restored
    /// to their default state (false).
    fn controls_locked(&self, locked: bool);

    /// A classification request is on its way; show the loading indicator.
    fn scan_started(&self, url: &str);

    /// The verdict for a completed scan, including elapsed time.
    fn verdict_rendered(&self, outcome: &ScanOutcome);

    /// The recent-activity buffer changed. An empty slice means "no
    /// history", which renders differently from a populated list.
    fn history_refreshed(&self, records: &[ScanRecord]);

    /// The session counters changed.
    fn stats_updated(&self, stats: &Statistics);

    /// Service-side daily totals arrived during initialization.
    fn service_stats_loaded(&self, stats: &ServiceStats);

    /// The statistics section was opened; first_view is true only the very
    /// first time across all sessions (drives the one-time reveal effect).
    fn stats_revealed(&self, stats: &Statistics, first_view: bool);

    /// A notification became visible. Replaces any previous one.
    fn notice_shown(&self, message: &str, kind: NoticeKind);

    /// The visible notification was dismissed.
    fn notice_cleared(&self);

    /// Whether the announcement banner should be on screen.
    fn announcement_visible(&self, visible: bool);
}

// A sink that records every call, for asserting on core behavior.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SinkEvent {
        ControlsLocked(bool),
        ScanStarted(String),
        Verdict { url: String, is_phishing: bool },
        HistoryRefreshed(Vec<String>),
        StatsUpdated(Statistics),
        ServiceStatsLoaded { scanned_today: u64 },
        StatsRevealed { first_view: bool },
        NoticeShown { message: String, kind: NoticeKind },
        NoticeCleared,
        AnnouncementVisible(bool),
    }

    #[derive(Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<SinkEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<SinkEvent> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: SinkEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl UiSink for RecordingSink {
        fn controls_locked(&self, locked: bool) {
            self.push(SinkEvent::ControlsLocked(locked));
        }

        fn scan_started(&self, url: &str) {
            self.push(SinkEvent::ScanStarted(url.to_string()));
        }

        fn verdict_rendered(&self, outcome: &ScanOutcome) {
            self.push(SinkEvent::Verdict {
                url: outcome.record.url.clone(),
                is_phishing: outcome.record.is_phishing,
            });
        }

        fn history_refreshed(&self, records: &[ScanRecord]) {
            self.push(SinkEvent::HistoryRefreshed(
                records.iter().map(|r| r.url.clone()).collect(),
            ));
        }

        fn stats_updated(&self, stats: &Statistics) {
            self.push(SinkEvent::StatsUpdated(*stats));
        }

        fn service_stats_loaded(&self, stats: &ServiceStats) {
            self.push(SinkEvent::ServiceStatsLoaded {
                scanned_today: stats.urls_scanned_today,
            });
        }

        fn stats_revealed(&self, _stats: &Statistics, first_view: bool) {
            self.push(SinkEvent::StatsRevealed { first_view });
        }

        fn notice_shown(&self, message: &str, kind: NoticeKind) {
            self.push(SinkEvent::NoticeShown {
                message: message.to_string(),
                kind,
            });
        }

        fn notice_cleared(&self) {
            self.push(SinkEvent::NoticeCleared);
        }

        fn announcement_visible(&self, visible: bool) {
            self.push(SinkEvent::AnnouncementVisible(visible));
        }
    }
}

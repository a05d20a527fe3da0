// src/scan/controller.rs
// =============================================================================
// This module is the scan orchestrator - the one place with real control
// flow. One check_url() call drives one lifecycle:
//
//   Idle -> Validating -> Requesting -> Succeeded/Failed -> Idle
//
// Guarantees:
// - At most one classification request in flight; a check_url() arriving
//   while one is running is dropped, never queued
// - Validation failures never lock the controls and never touch the network
// - History and statistics are updated strictly before the verdict is
//   rendered, so observers always see them consistent
// - The controls are unlocked exactly once per lifecycle, on every path:
//   the request body returns a Result and the unlock happens before that
//   Result is even looked at
//
// Startup runs a separate one-time init(): three independent fetches run
// concurrently, and a failure in one never blocks the other two.
// =============================================================================

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use url::Url;

use crate::api::ClassifierApi;
use crate::error::CheckError;
use crate::flags::{FlagStore, PersistedFlag};
use crate::validate;

use super::history::{now_timestamp, HistoryStore, ScanRecord};
use super::notify::{NoticeKind, NotificationPresenter};
use super::sink::UiSink;
use super::stats::{Statistics, StatsCounter};

/// Where the controller is inside one check lifecycle. Succeeded and
/// Failed are transient: the controller passes through them and lands
/// back on Idle before check_url() returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Validating,
    Requesting,
    Succeeded,
    Failed,
}

// Everything the rendering layer gets for a completed scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    #[serde(flatten)]
    pub record: ScanRecord,
    /// Optional human-readable note from the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Any extra fields the service attached, passed through opaquely
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
    pub elapsed_ms: u64,
}

#[derive(Debug)]
struct ControllerState {
    phase: ScanPhase,
    input_locked: bool,
}

pub struct ScanController {
    api: Box<dyn ClassifierApi>,
    flags: FlagStore,
    history: HistoryStore,
    stats: StatsCounter,
    notices: NotificationPresenter,
    sink: Arc<dyn UiSink>,
    state: Mutex<ControllerState>,
}

impl ScanController {
    pub fn new(api: Box<dyn ClassifierApi>, flags: FlagStore, sink: Arc<dyn UiSink>) -> Self {
        Self {
            api,
            flags,
            history: HistoryStore::new(),
            stats: StatsCounter::new(),
            notices: NotificationPresenter::new(Arc::clone(&sink)),
            sink,
            state: Mutex::new(ControllerState {
                phase: ScanPhase::Idle,
                input_locked: false,
            }),
        }
    }

    /// One-time startup sequence. The three legs are independent: history
    /// seeds the buffer and the session counters, the service baseline is
    /// display-only, and the banner flag decides the announcement. Each
    /// failure is logged and skipped without touching the other legs.
    pub async fn init(&self) {
        let (history, service_stats, banner_closed) = futures::join!(
            self.api.fetch_history(),
            self.api.fetch_service_stats(),
            self.flags.get(PersistedFlag::AnnouncementClosed),
        );

        match history {
            Ok(records) => {
                let records = self.history.replace(records);
                let stats = self.stats.seed_from(&records);
                self.sink.history_refreshed(&records);
                self.sink.stats_updated(&stats);
            }
            Err(e) => log::warn!("could not load scan history: {}", e),
        }

        match service_stats {
            Ok(stats) => self.sink.service_stats_loaded(&stats),
            Err(e) => log::warn!("could not load service statistics: {}", e),
        }

        self.sink.announcement_visible(!banner_closed);
    }

    /// Drives one full check lifecycle for raw user input.
    ///
    /// Returns the outcome on success; None when the input was rejected,
    /// the request failed, or the call was dropped by the re-entrancy
    /// guard. Failures are already rendered as notices by the time this
    /// returns.
    pub async fn check_url(&self, raw: &str) -> Option<ScanOutcome> {
        // Re-entrancy guard: one lifecycle at a time, later calls are
        // dropped, not queued. The trigger control is disabled during this
        // window, but an invocation that slips through anyway is dropped too.
        {
            let mut state = self.state.lock().unwrap();
            if state.input_locked
                || matches!(state.phase, ScanPhase::Validating | ScanPhase::Requesting)
            {
                log::debug!("check dropped: a scan is already in flight");
                return None;
            }
            state.phase = ScanPhase::Validating;
        }

        // A new attempt dismisses whatever notice is still on screen
        self.notices.hide();

        let checked = match validate::check_input(raw) {
            Ok(url) => url,
            Err(e) => {
                // Rejected locally: no request, controls were never locked
                log::debug!("input rejected: {}", e);
                self.notices.show(&e.user_message(), NoticeKind::Error);
                self.set_phase(ScanPhase::Failed);
                self.set_phase(ScanPhase::Idle);
                return None;
            }
        };

        self.set_phase(ScanPhase::Requesting);
        self.set_locked(true);
        self.sink.scan_started(checked.as_str());
        let started = Instant::now();

        let result = self.run_request(&checked, started).await;

        // Unconditional cleanup: this runs exactly once per lifecycle,
        // before the result is acted on
        self.set_locked(false);

        match result {
            Ok(outcome) => {
                self.set_phase(ScanPhase::Succeeded);
                self.set_phase(ScanPhase::Idle);
                Some(outcome)
            }
            Err(e) => {
                log::warn!("scan failed: {}", e);
                self.notices.show(&e.user_message(), NoticeKind::Error);
                self.set_phase(ScanPhase::Failed);
                self.set_phase(ScanPhase::Idle);
                None
            }
        }
    }

    // The fallible part of the lifecycle. Kept separate so check_url can
    // apply cleanup and error rendering uniformly to every failure.
    async fn run_request(
        &self,
        checked: &Url,
        started: Instant,
    ) -> Result<ScanOutcome, CheckError> {
        let verdict = self.api.classify(checked.as_str()).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let record = ScanRecord {
            url: checked.as_str().to_string(),
            is_phishing: verdict.is_phishing,
            timestamp: now_timestamp(),
        };

        // The service echoes url and timestamp in its response; the record
        // is the canonical copy, so drop the echoes before the rest of the
        // extra fields pass through. Otherwise the serialized outcome would
        // carry both keys twice.
        let mut extra = verdict.extra;
        extra.remove("url");
        extra.remove("timestamp");

        let records = self.history.push(record.clone());
        let stats = self.stats.record(verdict.is_phishing);

        // History and statistics reach the sink before the verdict does
        self.sink.history_refreshed(&records);
        self.sink.stats_updated(&stats);

        let outcome = ScanOutcome {
            record,
            message: verdict.message,
            extra,
            elapsed_ms,
        };
        self.sink.verdict_rendered(&outcome);

        Ok(outcome)
    }

    /// Clears the scan history on the service and locally. Dropped while a
    /// scan is in flight so it can't race the in-flight update.
    pub async fn clear_history(&self) {
        {
            let state = self.state.lock().unwrap();
            if matches!(state.phase, ScanPhase::Validating | ScanPhase::Requesting) {
                log::debug!("clear-history dropped: a scan is in flight");
                return;
            }
        }

        match self.api.clear_history().await {
            Ok(()) => {
                self.history.clear();
                self.sink.history_refreshed(&[]);
                // The one Success-styled notice in the application;
                // auto-dismisses after three seconds
                self.notices.show("History cleared", NoticeKind::Success);
            }
            Err(e) => {
                log::warn!("could not clear history: {}", e);
                self.notices.show(&e.user_message(), NoticeKind::Error);
            }
        }
    }

    /// Opens the statistics view. The first reveal ever (persisted across
    /// sessions) is flagged so the renderer can play its one-time effect.
    pub async fn reveal_stats(&self) {
        let first_view = !self.flags.get(PersistedFlag::StatsViewed).await;
        if first_view {
            self.flags.set(PersistedFlag::StatsViewed).await;
        }
        self.sink.stats_revealed(&self.stats.snapshot(), first_view);
    }

    /// The user closed the announcement banner; never shown again.
    pub async fn dismiss_announcement(&self) {
        self.flags.set(PersistedFlag::AnnouncementClosed).await;
        self.sink.announcement_visible(false);
    }

    /// The external report page for a URL, ready to open in a browser.
    pub fn report_page(&self, url: &str) -> Url {
        crate::api::report_page_url(url)
    }

    pub fn history(&self) -> Vec<ScanRecord> {
        self.history.current()
    }

    pub fn statistics(&self) -> Statistics {
        self.stats.snapshot()
    }

    fn set_phase(&self, phase: ScanPhase) {
        self.state.lock().unwrap().phase = phase;
    }

    fn set_locked(&self, locked: bool) {
        self.state.lock().unwrap().input_locked = locked;
        self.sink.controls_locked(locked);
    }
}

// src/scan/notify.rs
// =============================================================================
// This module manages the single transient notification slot.
//
// Rules:
// - At most one notice is visible at a time; show() replaces the previous
// - Error notices stay until a new check attempt or an explicit hide()
// - Success notices dismiss themselves after 3 seconds
// - Replacing a Success notice cancels its pending dismissal, so a stale
//   timer can never hide a newer message
//
// The cancellation has two layers: the pending task is aborted outright,
// and a generation counter guards the case where the task already woke up
// and is about to clear the slot.
//
// Rust concepts:
// - tokio::spawn + JoinHandle::abort: Cancellable background work
// - Arc<Mutex<...>>: The dismiss task and the presenter share the slot
// =============================================================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::sink::UiSink;

/// How long a Success notice stays on screen before dismissing itself.
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Persists until replaced or explicitly hidden
    Error,
    /// Auto-dismisses after DISMISS_AFTER
    Success,
}

#[derive(Default)]
struct NoticeSlot {
    /// Bumped on every show/hide; a dismiss task only fires if the
    /// generation it captured is still current
    generation: u64,
    visible: bool,
    pending_dismiss: Option<JoinHandle<()>>,
}

pub struct NotificationPresenter {
    sink: Arc<dyn UiSink>,
    slot: Arc<Mutex<NoticeSlot>>,
}

impl NotificationPresenter {
    pub fn new(sink: Arc<dyn UiSink>) -> Self {
        Self {
            sink,
            slot: Arc::new(Mutex::new(NoticeSlot::default())),
        }
    }

    /// Shows a notice, replacing whatever was visible before. Success
    /// notices schedule their own dismissal.
    pub fn show(&self, message: &str, kind: NoticeKind) {
        let generation = {
            let mut slot = self.slot.lock().unwrap();
            slot.generation += 1;
            if let Some(pending) = slot.pending_dismiss.take() {
                pending.abort();
            }
            slot.visible = true;
            slot.generation
        };

        self.sink.notice_shown(message, kind);

        if kind == NoticeKind::Success {
            let slot = Arc::clone(&self.slot);
            let sink = Arc::clone(&self.sink);

            let handle = tokio::spawn(async move {
                tokio::time::sleep(DISMISS_AFTER).await;

                let should_clear = {
                    let mut slot = slot.lock().unwrap();
                    if slot.generation == generation && slot.visible {
                        slot.visible = false;
                        slot.pending_dismiss = None;
                        true
                    } else {
                        false
                    }
                };

                if should_clear {
                    sink.notice_cleared();
                }
            });

            self.slot.lock().unwrap().pending_dismiss = Some(handle);
        }
    }

    /// Dismisses the visible notice, if any, and invalidates any pending
    /// auto-dismiss. Safe to call when nothing is showing.
    pub fn hide(&self) {
        let was_visible = {
            let mut slot = self.slot.lock().unwrap();
            slot.generation += 1;
            if let Some(pending) = slot.pending_dismiss.take() {
                pending.abort();
            }
            let was = slot.visible;
            slot.visible = false;
            was
        };

        if was_visible {
            self.sink.notice_cleared();
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why both abort() AND a generation counter?
//    - abort() stops the task if it's still sleeping
//    - But the task might have JUST woken up and be past its sleep when we
//      abort; then it still runs its closing code
//    - The generation check makes that late run a no-op, so the dismissal
//      of an old notice can never hide a newer one
//
// 2. Why is the lock never held across .await?
//    - A std::sync::Mutex guard held across an await point can deadlock
//      the single-threaded runtime and doesn't implement Send
//    - So: lock, mutate, unlock - then await
//
// 3. What does start_paused = true do in the tests?
//    - tokio's clock is frozen and only advances when every task is idle
//    - A 3 second timer test finishes in microseconds, deterministically
// -----------------------------------------------------------------------------

//! Request/response orchestration between a trigger, the floating
//! window, and the translation backend.
//!
//! Concurrent triggers are not queued or cancelled; each dispatch gets a
//! monotonic ticket and only the latest one is allowed to report into
//! the window, so overlapping calls cannot leave a stale result on
//! screen.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::core::translator::TranslationBackend;
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::shared::types::{ProcessingPayload, TranslationRequest, TranslationResult};

/// Capability surface of the floating window as seen by the
/// orchestration core. The Tauri-backed implementation lives in
/// `system::window`; tests substitute a recording fake.
pub trait WindowPresenter {
    /// Make sure the window exists, creating it if it was destroyed.
    /// Returns `true` when a new window had to be created.
    fn ensure(&self) -> AppResult<bool>;
    fn show(&self) -> AppResult<()>;
    fn hide(&self) -> AppResult<()>;
    /// Push an event at the window. Must never fail: a destroyed window
    /// swallows the event.
    fn push(&self, event: &AppEvent);
    fn set_opacity(&self, opacity: f64);
}

#[derive(Debug, Default)]
pub struct TranslationSequencer {
    next: AtomicU64,
    current: AtomicU64,
}

impl TranslationSequencer {
    /// Claim a ticket for a new dispatch, superseding any in-flight one.
    pub fn begin(&self) -> u64 {
        let ticket = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.current.store(ticket, Ordering::SeqCst);
        ticket
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.load(Ordering::SeqCst) == ticket
    }
}

/// Run one translation against the window: push `processing`, await the
/// backend, then push `success` or `error` unless a newer dispatch has
/// claimed the window in the meantime. The outcome is returned either
/// way so request/response callers still get their answer.
pub async fn translate_and_report<P, B>(
    presenter: &P,
    backend: &B,
    sequencer: &TranslationSequencer,
    request: TranslationRequest,
) -> AppResult<TranslationResult>
where
    P: WindowPresenter,
    B: TranslationBackend + ?Sized,
{
    let ticket = sequencer.begin();
    presenter.push(&AppEvent::Processing(ProcessingPayload::from(&request)));

    let outcome = backend.translate(&request).await;

    if !sequencer.is_current(ticket) {
        debug!(target: "orchestrator", ticket, "discarding superseded translation result");
        return outcome;
    }

    match &outcome {
        Ok(result) => presenter.push(&AppEvent::Success(result.clone())),
        Err(err) => presenter.push(&AppEvent::Error(err.to_string())),
    }

    outcome
}

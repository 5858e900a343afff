//! Tests for the recognition session state machine, using a scripted stub
//! provider so lifecycle events can be fired deterministically.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::events::SessionEvent;
use super::provider::{
    RecognitionError, RecognitionErrorCallback, RecognitionLifecycleCallback, RecognitionProvider,
    RecognitionResult, RecognitionUpdate, RecognitionUpdateCallback,
};
use super::session::{
    MAX_RESTART_ATTEMPTS, RecognitionSession, RESTART_DELAY, SessionState,
};

/// Callback slots shared between a scripted provider and the test body, so
/// tests can fire engine events directly.
#[derive(Default)]
struct CallbackSlots {
    started: Mutex<Option<RecognitionLifecycleCallback>>,
    update: Mutex<Option<RecognitionUpdateCallback>>,
    error: Mutex<Option<RecognitionErrorCallback>>,
    ended: Mutex<Option<RecognitionLifecycleCallback>>,
}

impl CallbackSlots {
    async fn fire_started(&self) {
        let callback = self.started.lock().clone();
        if let Some(callback) = callback {
            callback().await;
        }
    }

    async fn fire_update(&self, update: RecognitionUpdate) {
        let callback = self.update.lock().clone();
        if let Some(callback) = callback {
            callback(update).await;
        }
    }

    async fn fire_error(&self, err: RecognitionError) {
        let callback = self.error.lock().clone();
        if let Some(callback) = callback {
            callback(err).await;
        }
    }

    async fn fire_ended(&self) {
        let callback = self.ended.lock().clone();
        if let Some(callback) = callback {
            callback().await;
        }
    }
}

/// Stub provider whose `start` outcomes are scripted and whose engine events
/// are fired by the test through shared [`CallbackSlots`].
struct ScriptedProvider {
    active: AtomicBool,
    /// Outcomes for successive `start` calls; empty means `Ok`.
    start_results: Arc<Mutex<VecDeque<RecognitionResult<()>>>>,
    start_calls: Arc<AtomicUsize>,
    stop_calls: Arc<AtomicUsize>,
    language: Arc<Mutex<String>>,
    slots: Arc<CallbackSlots>,
    /// Fire the started event as soon as `start` succeeds.
    auto_confirm_start: bool,
}

impl ScriptedProvider {
    fn new(slots: Arc<CallbackSlots>, auto_confirm_start: bool) -> Self {
        Self {
            active: AtomicBool::new(false),
            start_results: Arc::new(Mutex::new(VecDeque::new())),
            start_calls: Arc::new(AtomicUsize::new(0)),
            stop_calls: Arc::new(AtomicUsize::new(0)),
            language: Arc::new(Mutex::new(String::new())),
            slots,
            auto_confirm_start,
        }
    }

    fn script_start_results(&self, results: Vec<RecognitionResult<()>>) {
        *self.start_results.lock() = results.into();
    }

    fn start_calls(&self) -> Arc<AtomicUsize> {
        self.start_calls.clone()
    }

    fn stop_calls(&self) -> Arc<AtomicUsize> {
        self.stop_calls.clone()
    }

    fn language(&self) -> Arc<Mutex<String>> {
        self.language.clone()
    }
}

#[async_trait::async_trait]
impl RecognitionProvider for ScriptedProvider {
    async fn start(&mut self) -> RecognitionResult<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.start_results.lock().pop_front();
        match scripted.unwrap_or(Ok(())) {
            Ok(()) => {
                self.active.store(true, Ordering::SeqCst);
                if self.auto_confirm_start {
                    self.slots.fire_started().await;
                }
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn stop(&mut self) -> RecognitionResult<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    async fn set_language(&mut self, language: &str) -> RecognitionResult<()> {
        *self.language.lock() = language.to_string();
        Ok(())
    }

    async fn on_started(
        &mut self,
        callback: RecognitionLifecycleCallback,
    ) -> RecognitionResult<()> {
        *self.slots.started.lock() = Some(callback);
        Ok(())
    }

    async fn on_update(&mut self, callback: RecognitionUpdateCallback) -> RecognitionResult<()> {
        *self.slots.update.lock() = Some(callback);
        Ok(())
    }

    async fn on_error(&mut self, callback: RecognitionErrorCallback) -> RecognitionResult<()> {
        *self.slots.error.lock() = Some(callback);
        Ok(())
    }

    async fn on_ended(&mut self, callback: RecognitionLifecycleCallback) -> RecognitionResult<()> {
        *self.slots.ended.lock() = Some(callback);
        Ok(())
    }
}

async fn started_session(
    auto_confirm_start: bool,
) -> (RecognitionSession, Arc<CallbackSlots>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let slots = Arc::new(CallbackSlots::default());
    let provider = ScriptedProvider::new(slots.clone(), auto_confirm_start);
    let start_calls = provider.start_calls();
    let stop_calls = provider.stop_calls();

    let session = RecognitionSession::new(Box::new(provider), "en-US");
    session.bind().await.unwrap();
    session.start().await.unwrap();
    if !auto_confirm_start {
        slots.fire_started().await;
    }
    assert_eq!(session.state(), SessionState::Listening);
    (session, slots, start_calls, stop_calls)
}

/// Sleep past the restart delay so a pending recovery task runs.
async fn let_recovery_run() {
    tokio::time::sleep(RESTART_DELAY + Duration::from_millis(100)).await;
}

fn collect_events(session: &RecognitionSession) -> Arc<Mutex<Vec<SessionEvent>>> {
    let events: Arc<Mutex<Vec<SessionEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    session.on_event(Arc::new(move |event| {
        let sink = sink.clone();
        Box::pin(async move {
            sink.lock().push(event);
        })
    }));
    events
}

#[tokio::test(start_paused = true)]
async fn transient_error_recovers_and_resets_counter() {
    let (session, slots, start_calls, _) = started_session(true).await;

    slots
        .fire_error(RecognitionError::Network("socket closed".into()))
        .await;
    assert_eq!(session.state(), SessionState::Recovering);
    assert_eq!(session.restart_attempts(), 1);

    let_recovery_run().await;
    assert_eq!(session.state(), SessionState::Listening);
    assert_eq!(session.restart_attempts(), 0);
    assert_eq!(start_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn unexpected_end_while_recording_triggers_recovery() {
    let (session, slots, start_calls, _) = started_session(true).await;

    slots.fire_ended().await;
    assert_eq!(session.state(), SessionState::Recovering);

    let_recovery_run().await;
    assert_eq!(session.state(), SessionState::Listening);
    assert_eq!(start_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn restart_attempts_are_bounded() {
    // Restarts are accepted but never confirmed, so the counter is never
    // reset: the session must give up after MAX_RESTART_ATTEMPTS.
    let (session, slots, _, _) = started_session(false).await;

    for expected_attempt in 1..=MAX_RESTART_ATTEMPTS {
        slots.fire_ended().await;
        assert_eq!(session.state(), SessionState::Recovering);
        assert_eq!(session.restart_attempts(), expected_attempt);
        let_recovery_run().await;
    }

    slots.fire_ended().await;
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.restart_attempts(), MAX_RESTART_ATTEMPTS);
}

#[tokio::test(start_paused = true)]
async fn two_consecutive_restart_failures_stop_the_session() {
    let slots = Arc::new(CallbackSlots::default());
    let provider = ScriptedProvider::new(slots.clone(), true);
    let start_calls = provider.start_calls();
    let stop_calls = provider.stop_calls();
    // Initial start succeeds; both restart attempts fail.
    provider.script_start_results(vec![
        Ok(()),
        Err(RecognitionError::Network("unreachable".into())),
        Err(RecognitionError::Network("unreachable".into())),
    ]);

    let session = RecognitionSession::new(Box::new(provider), "en-US");
    session.bind().await.unwrap();
    session.start().await.unwrap();

    slots.fire_ended().await;
    // First attempt after RESTART_DELAY fails, re-initialization retry after
    // another RESTART_DELAY fails too.
    tokio::time::sleep(RESTART_DELAY * 2 + Duration::from_millis(100)).await;

    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(start_calls.load(Ordering::SeqCst), 3);
    // Re-initialization stops the engine before the second try.
    assert!(stop_calls.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(start_paused = true)]
async fn permission_denied_disables_recording() {
    let (session, slots, _, _) = started_session(true).await;
    let events = collect_events(&session);

    slots
        .fire_error(RecognitionError::PermissionDenied("mic blocked".into()))
        .await;
    assert_eq!(session.state(), SessionState::Disabled);
    assert!(
        events
            .lock()
            .contains(&SessionEvent::PermissionChanged { granted: false })
    );

    // Starting again is refused until permission is re-granted.
    assert!(session.start().await.is_err());

    session.reset_permission().await;
    assert_eq!(session.state(), SessionState::Idle);
    session.start().await.unwrap();
    assert_eq!(session.state(), SessionState::Listening);
}

#[tokio::test(start_paused = true)]
async fn aborted_error_is_logged_not_recovered() {
    let (session, slots, start_calls, _) = started_session(true).await;

    slots
        .fire_error(RecognitionError::Aborted("user cancelled".into()))
        .await;
    let_recovery_run().await;

    assert_eq!(session.state(), SessionState::Listening);
    assert_eq!(start_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_pending_recovery() {
    let (session, slots, start_calls, _) = started_session(true).await;

    slots.fire_ended().await;
    assert_eq!(session.state(), SessionState::Recovering);

    session.stop().await;
    assert_eq!(session.state(), SessionState::Idle);

    let_recovery_run().await;
    // No restart happened after the explicit stop.
    assert_eq!(start_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn page_hidden_and_shutdown_behave_like_stop() {
    let (session, slots, start_calls, _) = started_session(true).await;

    slots.fire_ended().await;
    assert_eq!(session.state(), SessionState::Recovering);

    session.page_hidden().await;
    assert_eq!(session.state(), SessionState::Idle);

    let_recovery_run().await;
    assert_eq!(start_calls.load(Ordering::SeqCst), 1);

    // A fresh recording can start afterwards, and shutdown ends it too.
    session.start().await.unwrap();
    assert_eq!(session.state(), SessionState::Listening);

    slots.fire_ended().await;
    assert_eq!(session.state(), SessionState::Recovering);

    session.shutdown().await;
    assert_eq!(session.state(), SessionState::Idle);

    let_recovery_run().await;
    assert_eq!(start_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn language_change_while_listening_restarts_after_settling() {
    let slots = Arc::new(CallbackSlots::default());
    let provider = ScriptedProvider::new(slots.clone(), true);
    let start_calls = provider.start_calls();
    let stop_calls = provider.stop_calls();
    let language = provider.language();

    let session = RecognitionSession::new(Box::new(provider), "en-US");
    session.bind().await.unwrap();
    session.start().await.unwrap();
    assert_eq!(language.lock().as_str(), "en-US");

    session.set_language("es-ES").await.unwrap();
    assert_eq!(language.lock().as_str(), "es-ES");
    assert_eq!(stop_calls.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(start_calls.load(Ordering::SeqCst), 2);
    assert_eq!(session.state(), SessionState::Listening);
}

#[tokio::test(start_paused = true)]
async fn transcript_accumulates_and_feeds_finalized_text() {
    let (session, slots, _, _) = started_session(true).await;
    let events = collect_events(&session);

    let finalized: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = finalized.clone();
    session.on_finalized_text(Arc::new(move |text| {
        let sink = sink.clone();
        Box::pin(async move {
            sink.lock().push(text);
        })
    }));

    slots
        .fire_update(RecognitionUpdate::interim("take two"))
        .await;
    slots
        .fire_update(RecognitionUpdate::finalized("take two tablets"))
        .await;
    slots
        .fire_update(RecognitionUpdate::finalized("with water"))
        .await;

    assert_eq!(
        finalized.lock().as_slice(),
        [
            "take two tablets".to_string(),
            "take two tablets with water".to_string()
        ]
    );
    assert!(events.lock().iter().any(|event| matches!(
        event,
        SessionEvent::TranscriptChanged { interim, .. } if interim == "take two"
    )));

    session.clear_transcript().await;
    assert!(session.transcript().is_empty());
}

#[tokio::test(start_paused = true)]
async fn new_recording_start_clears_transcript() {
    let (session, slots, _, _) = started_session(true).await;

    slots
        .fire_update(RecognitionUpdate::finalized("take two tablets"))
        .await;
    assert!(!session.transcript().is_empty());

    session.stop().await;
    session.start().await.unwrap();
    assert!(session.transcript().is_empty());
}

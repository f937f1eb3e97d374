//! ConversationController - Orchestrates one conversation with the friend.
//!
//! Each accepted line is echoed, appended to the transcript and fanned out to
//! two independent remote calls:
//!
//! 1. The emotion classifier (observational, never touches the gate)
//! 2. The reply generator (its completion reopens the gate)
//!
//! ## State Flow
//!
//! ```text
//! Idle ──submit──▶ AwaitingReply ──reply ok──▶ Idle
//!                        │
//!                        └──reply failed──▶ Error ──▶ Idle
//! ```
//!
//! Lines that arrive while a reply is pending are dropped, never queued.
//!
//! ## Display
//!
//! Display updates are collected while the state lock is held and pushed to
//! the surface after it is released, so a surface may read the controller.
//! A separate display lock keeps updates from concurrent tasks in order.
//!
//! ## Shutdown
//!
//! `stop` flips a watch channel observed by the input listener and every
//! in-flight task. A cancelled reply reopens the gate without adding turns.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::submission::{
    ClassificationOutcome, IgnoreReason, ReplyOutcome, Submission, SubmitOutcome,
};
use crate::domain::conversation::{
    friend_lines, ConversationState, PromptBuilder, PromptRenderConfig, ReplyLinePolicy,
    TranscriptStore, Turn,
};
use crate::domain::foundation::{StateMachine, SubmissionId};
use crate::ports::{DisplaySurface, DisplayUpdate, EmotionClassifier, InferenceError, ReplyGenerator};

/// Default bound on each remote call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Placeholder shown while the reply is pending.
pub const DEFAULT_TYPING_PLACEHOLDER: &str = "…typing…";

/// Friend line shown when the controller starts.
pub const DEFAULT_OPENING_LINE: &str = "hii, don't you miss the Bieber swag era? :P";

/// Controller behaviour settings.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Bound on each classify/generate call.
    pub call_timeout: Duration,

    /// How multi-line replies become Friend turns.
    pub reply_lines: ReplyLinePolicy,

    /// Transient Friend line shown while awaiting the reply.
    pub typing_placeholder: String,

    /// Display-only greeting shown by `start`. Never added to the transcript.
    pub opening_line: Option<String>,

    /// Prompt rendering settings.
    pub prompt: PromptRenderConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            reply_lines: ReplyLinePolicy::default(),
            typing_placeholder: DEFAULT_TYPING_PLACEHOLDER.to_string(),
            opening_line: Some(DEFAULT_OPENING_LINE.to_string()),
            prompt: PromptRenderConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_reply_lines(mut self, policy: ReplyLinePolicy) -> Self {
        self.reply_lines = policy;
        self
    }

    pub fn with_opening_line(mut self, line: Option<String>) -> Self {
        self.opening_line = line;
        self
    }
}

/// Lifecycle misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("conversation controller is already started")]
    AlreadyStarted,

    #[error("conversation controller has been stopped")]
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Stopped,
}

struct Inner {
    state: ConversationState,
    transcript: TranscriptStore,
    input_enabled: bool,
    lifecycle: Lifecycle,
}

impl Inner {
    fn set_input_enabled(&mut self, enabled: bool, effects: &mut Vec<DisplayEffect>) {
        self.input_enabled = enabled;
        effects.push(DisplayEffect::InputEnabled(enabled));
    }
}

/// Display work deferred until the state lock is released.
enum DisplayEffect {
    Show(DisplayUpdate),
    InputEnabled(bool),
}

struct Shared {
    classifier: Arc<dyn EmotionClassifier>,
    generator: Arc<dyn ReplyGenerator>,
    display: Arc<dyn DisplaySurface>,
    config: ControllerConfig,
    inner: Mutex<Inner>,
    // Taken before `inner`, held until the collected effects are shown.
    display_order: Mutex<()>,
    state_tx: watch::Sender<ConversationState>,
    shutdown_tx: watch::Sender<bool>,
}

/// Drives the conversation gate. Clones share the same conversation.
#[derive(Clone)]
pub struct ConversationController {
    shared: Arc<Shared>,
}

impl ConversationController {
    /// Creates a controller with default settings.
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        generator: Arc<dyn ReplyGenerator>,
        display: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self::with_config(classifier, generator, display, ControllerConfig::default())
    }

    /// Creates a controller with custom settings.
    pub fn with_config(
        classifier: Arc<dyn EmotionClassifier>,
        generator: Arc<dyn ReplyGenerator>,
        display: Arc<dyn DisplaySurface>,
        config: ControllerConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConversationState::Idle);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            shared: Arc::new(Shared {
                classifier,
                generator,
                display,
                config,
                inner: Mutex::new(Inner {
                    state: ConversationState::Idle,
                    transcript: TranscriptStore::new(),
                    input_enabled: true,
                    lifecycle: Lifecycle::Created,
                }),
                display_order: Mutex::new(()),
                state_tx,
                shutdown_tx,
            }),
        }
    }

    /// Registers with the input source and shows the opening line.
    ///
    /// Every line received on `inputs` is forwarded to [`submit`](Self::submit).
    /// The returned handle completes when `inputs` closes or `stop` is called.
    /// Must be called from within a Tokio runtime.
    pub fn start(
        &self,
        mut inputs: mpsc::Receiver<String>,
    ) -> Result<JoinHandle<()>, ControllerError> {
        let shared = &self.shared;
        let _display = shared.display_turn();
        let mut effects = Vec::new();
        {
            let mut inner = shared.lock();
            match inner.lifecycle {
                Lifecycle::Running => return Err(ControllerError::AlreadyStarted),
                Lifecycle::Stopped => return Err(ControllerError::Stopped),
                Lifecycle::Created => inner.lifecycle = Lifecycle::Running,
            }

            tracing::info!(
                reply_lines = ?shared.config.reply_lines,
                history_window = shared.config.prompt.history_window,
                call_timeout_ms = shared.config.call_timeout.as_millis() as u64,
                "conversation started"
            );

            if let Some(opening) = &shared.config.opening_line {
                effects.push(DisplayEffect::Show(DisplayUpdate::friend(opening.as_str())));
            }
            effects.push(DisplayEffect::InputEnabled(inner.input_enabled));
        }
        shared.present(effects);

        let controller = self.clone();
        let mut shutdown = shared.shutdown_tx.subscribe();

        Ok(tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = shutdown_requested(&mut shutdown) => break,

                    line = inputs.recv() => match line {
                        Some(line) => {
                            controller.submit(&line);
                        }
                        None => break,
                    },
                }
            }
            tracing::debug!("input listener finished");
        }))
    }

    /// Deregisters from the input source and cancels in-flight calls.
    ///
    /// Calling `stop` more than once has no further effect.
    pub fn stop(&self) {
        {
            let mut inner = self.shared.lock();
            if inner.lifecycle == Lifecycle::Stopped {
                return;
            }
            inner.lifecycle = Lifecycle::Stopped;
        }
        self.shared.shutdown_tx.send_replace(true);
        tracing::info!("conversation stopped");
    }

    /// Submits a player line.
    ///
    /// Accepted only while `Idle` and when the trimmed line is non-empty.
    /// The gate is closed before this returns; both remote calls run on
    /// spawned tasks. Must be called from within a Tokio runtime.
    pub fn submit(&self, line: &str) -> SubmitOutcome {
        let text = line.trim();
        if text.is_empty() {
            tracing::debug!("ignoring empty line");
            return SubmitOutcome::Ignored(IgnoreReason::EmptyLine);
        }

        let shared = &self.shared;
        let id = SubmissionId::new();
        let display = shared.display_turn();
        let mut effects = Vec::new();

        let prompt = {
            let mut inner = shared.lock();
            if inner.lifecycle == Lifecycle::Stopped {
                return SubmitOutcome::Ignored(IgnoreReason::Stopped);
            }
            if !inner.state.accepts_user_input() {
                tracing::debug!(state = ?inner.state, "dropping line while busy");
                return SubmitOutcome::Ignored(IgnoreReason::Busy(inner.state));
            }

            shared.advance(&mut inner, ConversationState::AwaitingReply);
            inner.set_input_enabled(false, &mut effects);

            inner.transcript.append(Turn::user(text));
            effects.push(DisplayEffect::Show(DisplayUpdate::you(text)));
            effects.push(DisplayEffect::Show(DisplayUpdate::friend(
                shared.config.typing_placeholder.as_str(),
            )));

            PromptBuilder::build_from_store(&inner.transcript, &shared.config.prompt)
        };
        shared.present(effects);
        drop(display);

        tracing::info!(submission_id = %id, "line submitted");

        let classification = tokio::spawn(Shared::classify(
            Arc::clone(shared),
            id,
            text.to_string(),
        ));
        let reply = tokio::spawn(Shared::reply(Arc::clone(shared), id, prompt));

        SubmitOutcome::Accepted(Submission::new(id, reply, classification))
    }

    /// Current gate state.
    pub fn state(&self) -> ConversationState {
        self.shared.lock().state
    }

    /// Whether the player may type.
    pub fn input_enabled(&self) -> bool {
        self.shared.lock().input_enabled
    }

    /// Snapshot of the full transcript, oldest first.
    pub fn transcript(&self) -> Vec<Turn> {
        self.shared.lock().transcript.all().to_vec()
    }

    /// Receiver that observes every state change.
    pub fn watch_state(&self) -> watch::Receiver<ConversationState> {
        self.shared.state_tx.subscribe()
    }

    /// Waits until the gate is open again.
    pub async fn wait_until_idle(&self) {
        let mut states = self.watch_state();
        // The sender lives in `Shared`, which `self` keeps alive.
        let _ = states.wait_for(|state| state.accepts_user_input()).await;
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn advance(&self, inner: &mut Inner, target: ConversationState) {
        match inner.state.transition_to(target) {
            Ok(next) => {
                inner.state = next;
                self.state_tx.send_replace(next);
            }
            Err(e) => {
                tracing::error!(from = ?inner.state, to = ?target, error = %e, "rejected state transition");
            }
        }
    }

    fn display_turn(&self) -> MutexGuard<'_, ()> {
        self.display_order
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Pushes collected effects to the surface. Call without holding `inner`.
    fn present(&self, effects: Vec<DisplayEffect>) {
        for effect in effects {
            match effect {
                DisplayEffect::Show(update) => self.display.show(update),
                DisplayEffect::InputEnabled(enabled) => self.display.set_input_enabled(enabled),
            }
        }
    }

    /// Runs `call` bounded by the call timeout, unless shutdown comes first.
    async fn bounded<T, F>(&self, call: F) -> Option<Result<T, InferenceError>>
    where
        F: Future<Output = Result<T, InferenceError>>,
    {
        let mut shutdown = self.shutdown_tx.subscribe();
        let limit = self.config.call_timeout;

        tokio::select! {
            biased;

            _ = shutdown_requested(&mut shutdown) => None,

            result = timeout(limit, call) => {
                Some(result.unwrap_or_else(|_| Err(InferenceError::timeout(limit))))
            }
        }
    }

    async fn classify(self: Arc<Self>, id: SubmissionId, text: String) -> ClassificationOutcome {
        match self.bounded(self.classifier.classify(&text)).await {
            None => {
                tracing::debug!(submission_id = %id, "classification cancelled");
                ClassificationOutcome::Cancelled
            }
            Some(Ok(result)) => {
                tracing::info!(
                    submission_id = %id,
                    label = %result.label,
                    confidence = result.confidence,
                    "emotion detected"
                );
                ClassificationOutcome::Classified(result)
            }
            Some(Err(e)) => {
                tracing::warn!(submission_id = %id, error = %e, "emotion classification failed");
                ClassificationOutcome::Failed(e)
            }
        }
    }

    async fn reply(self: Arc<Self>, id: SubmissionId, prompt: String) -> ReplyOutcome {
        let generated = match self.bounded(self.generator.generate(&prompt)).await {
            None => return self.cancel_reply(id),
            Some(generated) => generated,
        };

        let lines = generated.and_then(|result| {
            let lines = self
                .config
                .reply_lines
                .shape(friend_lines(&result.text, &prompt));
            if lines.is_empty() {
                Err(InferenceError::EmptyResult)
            } else {
                Ok(lines)
            }
        });

        match lines {
            Ok(lines) => self.complete_reply(id, lines),
            Err(e) => self.fail_reply(id, e),
        }
    }

    fn complete_reply(&self, id: SubmissionId, lines: Vec<String>) -> ReplyOutcome {
        let _display = self.display_turn();
        let mut effects = Vec::new();
        {
            let mut inner = self.lock();
            for line in &lines {
                inner.transcript.append(Turn::friend(line.as_str()));
                effects.push(DisplayEffect::Show(DisplayUpdate::friend(line.as_str())));
            }
            self.advance(&mut inner, ConversationState::Idle);
            inner.set_input_enabled(true, &mut effects);
        }
        self.present(effects);

        tracing::info!(submission_id = %id, lines = lines.len(), "friend replied");
        ReplyOutcome::Replied(lines)
    }

    fn fail_reply(&self, id: SubmissionId, error: InferenceError) -> ReplyOutcome {
        tracing::warn!(submission_id = %id, error = %error, "reply failed");

        let summary = error.user_summary();
        let _display = self.display_turn();
        let mut effects = Vec::new();
        {
            let mut inner = self.lock();
            self.advance(&mut inner, ConversationState::Error);
            inner.transcript.append(Turn::system(summary.as_str()));
            effects.push(DisplayEffect::Show(DisplayUpdate::system(summary)));
            self.advance(&mut inner, ConversationState::Idle);
            inner.set_input_enabled(true, &mut effects);
        }
        self.present(effects);

        ReplyOutcome::Failed(error)
    }

    fn cancel_reply(&self, id: SubmissionId) -> ReplyOutcome {
        let _display = self.display_turn();
        let mut effects = Vec::new();
        {
            let mut inner = self.lock();
            if inner.state == ConversationState::AwaitingReply {
                self.advance(&mut inner, ConversationState::Idle);
                inner.set_input_enabled(true, &mut effects);
            }
        }
        self.present(effects);

        tracing::debug!(submission_id = %id, "reply cancelled");
        ReplyOutcome::Cancelled
    }
}

/// Resolves once shutdown has been requested.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let signalled = shutdown.wait_for(|stopped| *stopped).await.is_ok();
    if !signalled {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    use crate::adapters::display::RecordingDisplay;
    use crate::adapters::emotion_log::InMemoryEmotionLog;
    use crate::adapters::inference::{LoggingClassifier, MockEmotionClassifier, MockReplyGenerator};
    use crate::domain::conversation::TurnRole;

    /// Surface that reads the controller back from inside every update.
    #[derive(Default)]
    struct ReadingDisplay {
        controller: OnceLock<ConversationController>,
        seen: Mutex<Vec<(String, usize, ConversationState)>>,
    }

    impl DisplaySurface for ReadingDisplay {
        fn show(&self, update: DisplayUpdate) {
            if let Some(controller) = self.controller.get() {
                let len = controller.transcript().len();
                let state = controller.state();
                self.seen.lock().unwrap().push((update.to_string(), len, state));
            }
        }

        fn set_input_enabled(&self, enabled: bool) {
            if let Some(controller) = self.controller.get() {
                assert_eq!(controller.input_enabled(), enabled);
            }
        }
    }

    struct Fixture {
        controller: ConversationController,
        classifier: MockEmotionClassifier,
        generator: MockReplyGenerator,
        display: RecordingDisplay,
    }

    fn fixture_with(
        classifier: MockEmotionClassifier,
        generator: MockReplyGenerator,
        config: ControllerConfig,
    ) -> Fixture {
        let display = RecordingDisplay::new();
        let controller = ConversationController::with_config(
            Arc::new(classifier.clone()),
            Arc::new(generator.clone()),
            Arc::new(display.clone()),
            config,
        );
        Fixture {
            controller,
            classifier,
            generator,
            display,
        }
    }

    fn fixture(classifier: MockEmotionClassifier, generator: MockReplyGenerator) -> Fixture {
        fixture_with(classifier, generator, ControllerConfig::default())
    }

    fn roles_and_texts(turns: &[Turn]) -> Vec<(TurnRole, String)> {
        turns
            .iter()
            .map(|t| (t.role(), t.text().to_string()))
            .collect()
    }

    #[tokio::test]
    async fn submit_closes_the_gate_before_returning() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_delay(Duration::from_millis(50)),
        );

        let outcome = f.controller.submit("hi there");

        assert!(outcome.is_accepted());
        assert_eq!(f.controller.state(), ConversationState::AwaitingReply);
        assert!(!f.controller.input_enabled());
        assert!(!f.display.input_enabled());
    }

    #[tokio::test]
    async fn empty_and_whitespace_lines_are_ignored() {
        let f = fixture(MockEmotionClassifier::new(), MockReplyGenerator::new());

        for line in ["", "   ", "\t\n"] {
            match f.controller.submit(line) {
                SubmitOutcome::Ignored(reason) => assert_eq!(reason, IgnoreReason::EmptyLine),
                SubmitOutcome::Accepted(_) => panic!("{:?} should be ignored", line),
            }
        }

        assert!(f.controller.transcript().is_empty());
        assert_eq!(f.controller.state(), ConversationState::Idle);
        assert!(f.display.updates().is_empty());
        assert_eq!(f.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn hi_there_gets_a_friend_reply() {
        let f = fixture(
            MockEmotionClassifier::new().with_label("joy", 0.7),
            MockReplyGenerator::new().with_reply("Friend: lol yes!"),
        );

        let submission = f.controller.submit("hi there").accepted().unwrap();
        let (reply, classification) = submission.join().await;

        assert_eq!(reply, ReplyOutcome::Replied(vec!["lol yes!".to_string()]));
        assert!(matches!(classification, ClassificationOutcome::Classified(r) if r.label == "joy"));

        assert_eq!(
            roles_and_texts(&f.controller.transcript()),
            vec![
                (TurnRole::User, "hi there".to_string()),
                (TurnRole::Friend, "lol yes!".to_string()),
            ]
        );
        assert_eq!(
            f.display.lines(),
            vec!["You: hi there", "Friend: …typing…", "Friend: lol yes!"]
        );
        assert_eq!(f.display.input_toggles(), vec![false, true]);
        assert_eq!(f.controller.state(), ConversationState::Idle);
        assert!(f.controller.input_enabled());

        let prompt = &f.generator.calls()[0];
        assert!(prompt.ends_with("User: hi there\nFriend:"));
        assert_eq!(f.classifier.calls(), vec!["hi there"]);
    }

    #[tokio::test]
    async fn submitted_line_is_trimmed() {
        let f = fixture(MockEmotionClassifier::new(), MockReplyGenerator::new());

        f.controller.submit("  hey  ").accepted().unwrap().reply().await;

        assert_eq!(f.controller.transcript()[0].text(), "hey");
        assert_eq!(f.classifier.calls(), vec!["hey"]);
    }

    #[tokio::test]
    async fn server_error_becomes_a_system_turn() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_error(InferenceError::status(500, "boom")),
        );

        let reply = f.controller.submit("hi").accepted().unwrap().reply().await;

        assert_eq!(reply, ReplyOutcome::Failed(InferenceError::status(500, "boom")));
        let transcript = f.controller.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role(), TurnRole::System);
        assert_eq!(transcript[1].text(), "Error 500: couldn't reach your friend");
        assert_eq!(
            f.display.last(),
            Some(DisplayUpdate::system("Error 500: couldn't reach your friend"))
        );
        assert_eq!(f.controller.state(), ConversationState::Idle);
        assert!(f.controller.input_enabled());
    }

    #[tokio::test]
    async fn failure_passes_through_error_state() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new()
                .with_error(InferenceError::network("refused"))
                .with_delay(Duration::from_millis(20)),
        );
        let mut states = f.controller.watch_state();

        let submission = f.controller.submit("hi").accepted().unwrap();
        states.changed().await.unwrap();
        assert_eq!(*states.borrow_and_update(), ConversationState::AwaitingReply);

        submission.reply().await;
        // Error and Idle are published back to back; only the last is kept.
        assert_eq!(*states.borrow(), ConversationState::Idle);
        assert_eq!(
            f.controller.transcript()[1].text(),
            "Connection problem: couldn't reach your friend"
        );
    }

    #[tokio::test]
    async fn slow_classifier_does_not_hold_the_gate() {
        let f = fixture_with(
            MockEmotionClassifier::new().with_delay(Duration::from_secs(5)),
            MockReplyGenerator::new().with_reply("Friend: omg hiii"),
            ControllerConfig::default().with_call_timeout(Duration::from_millis(100)),
        );

        let submission = f.controller.submit("hi").accepted().unwrap();
        f.controller.wait_until_idle().await;

        assert_eq!(f.controller.transcript().len(), 2);
        assert!(f.controller.input_enabled());

        let classification = submission.classification().await;
        assert!(matches!(
            classification,
            ClassificationOutcome::Failed(InferenceError::Timeout { .. })
        ));
        assert_eq!(f.controller.transcript().len(), 2);
    }

    #[tokio::test]
    async fn timed_out_classification_leaves_no_log_entry() {
        let log = Arc::new(InMemoryEmotionLog::new());
        let classifier = LoggingClassifier::new(
            MockEmotionClassifier::new()
                .with_label("joy", 0.9)
                .with_delay(Duration::from_millis(300)),
            log.clone(),
        );
        let controller = ConversationController::with_config(
            Arc::new(classifier),
            Arc::new(MockReplyGenerator::new().with_reply("Friend: sup")),
            Arc::new(RecordingDisplay::new()),
            ControllerConfig::default().with_call_timeout(Duration::from_millis(50)),
        );

        let (reply, classification) = controller.submit("hi").accepted().unwrap().join().await;

        assert!(matches!(reply, ReplyOutcome::Replied(_)));
        assert_eq!(
            classification,
            ClassificationOutcome::Failed(InferenceError::Timeout { timeout_secs: 1 })
        );

        // Long enough for the abandoned call to have finished had it kept running.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn classifier_failure_is_not_shown() {
        let f = fixture(
            MockEmotionClassifier::new().with_error(InferenceError::status(503, "loading")),
            MockReplyGenerator::new().with_reply("Friend: sup"),
        );

        let (reply, classification) = f.controller.submit("hi").accepted().unwrap().join().await;

        assert!(matches!(reply, ReplyOutcome::Replied(_)));
        assert!(matches!(classification, ClassificationOutcome::Failed(_)));
        assert!(f
            .controller
            .transcript()
            .iter()
            .all(|t| t.role() != TurnRole::System));
    }

    #[tokio::test]
    async fn reply_timeout_reports_a_slow_friend() {
        let f = fixture_with(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_delay(Duration::from_secs(5)),
            ControllerConfig::default().with_call_timeout(Duration::from_millis(50)),
        );

        let reply = f.controller.submit("hi").accepted().unwrap().reply().await;

        assert!(matches!(reply, ReplyOutcome::Failed(InferenceError::Timeout { .. })));
        assert_eq!(
            f.controller.transcript()[1].text(),
            "Your friend took too long to reply"
        );
        assert_eq!(f.controller.state(), ConversationState::Idle);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn display_may_read_the_controller_while_updating() {
        let display = Arc::new(ReadingDisplay::default());
        let controller = ConversationController::new(
            Arc::new(MockEmotionClassifier::new()),
            Arc::new(MockReplyGenerator::new().with_reply("Friend: lol yes!")),
            display.clone(),
        );
        let _ = display.controller.set(controller.clone());

        let submitting = controller.clone();
        let submission = timeout(
            Duration::from_secs(2),
            tokio::task::spawn_blocking(move || submitting.submit("hi there")),
        )
        .await
        .expect("submit blocked on the display")
        .unwrap()
        .accepted()
        .unwrap();

        let reply = timeout(Duration::from_secs(2), submission.reply())
            .await
            .expect("reply blocked on the display");

        assert_eq!(reply, ReplyOutcome::Replied(vec!["lol yes!".to_string()]));
        assert_eq!(
            *display.seen.lock().unwrap(),
            vec![
                ("You: hi there".to_string(), 1, ConversationState::AwaitingReply),
                ("Friend: …typing…".to_string(), 1, ConversationState::AwaitingReply),
                ("Friend: lol yes!".to_string(), 2, ConversationState::Idle),
            ]
        );
    }

    #[tokio::test]
    async fn lines_while_awaiting_are_dropped() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_delay(Duration::from_millis(50)),
        );

        let first = f.controller.submit("first").accepted().unwrap();
        let second = f.controller.submit("second");

        assert!(matches!(
            second,
            SubmitOutcome::Ignored(IgnoreReason::Busy(ConversationState::AwaitingReply))
        ));

        first.reply().await;
        let users: Vec<_> = f
            .controller
            .transcript()
            .into_iter()
            .filter(|t| t.role() == TurnRole::User)
            .collect();
        assert_eq!(users.len(), 1);
        assert_eq!(f.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn gate_reopens_for_the_next_line() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new()
                .with_reply("Friend: one")
                .with_reply("Friend: two"),
        );

        f.controller.submit("a").accepted().unwrap().reply().await;
        f.controller.submit("b").accepted().unwrap().reply().await;

        let texts: Vec<_> = f
            .controller
            .transcript()
            .iter()
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(texts, vec!["a", "one", "b", "two"]);

        // The second prompt includes the first exchange.
        assert!(f.generator.calls()[1].ends_with("User: a\nFriend: one\nUser: b\nFriend:"));
    }

    #[tokio::test]
    async fn multi_line_reply_becomes_separate_turns_by_default() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_reply("Friend: omg\nFriend: my Razr died\nUser: lol"),
        );

        let reply = f.controller.submit("hey").accepted().unwrap().reply().await;

        assert_eq!(
            reply,
            ReplyOutcome::Replied(vec!["omg".to_string(), "my Razr died".to_string()])
        );
        assert_eq!(f.controller.transcript().len(), 3);
    }

    #[tokio::test]
    async fn join_lines_policy_appends_one_turn() {
        let f = fixture_with(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_reply("Friend: omg\nmy Razr died"),
            ControllerConfig::default().with_reply_lines(ReplyLinePolicy::JoinLines),
        );

        f.controller.submit("hey").accepted().unwrap().reply().await;

        let transcript = f.controller.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].text(), "omg my Razr died");
    }

    #[tokio::test]
    async fn cue_only_reply_counts_as_no_reply() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_reply("Friend:   "),
        );

        let reply = f.controller.submit("hey").accepted().unwrap().reply().await;

        assert_eq!(reply, ReplyOutcome::Failed(InferenceError::EmptyResult));
        assert_eq!(f.controller.transcript()[1].text(), "No reply");
    }

    #[tokio::test]
    async fn stop_cancels_the_pending_reply() {
        let f = fixture(
            MockEmotionClassifier::new().with_delay(Duration::from_secs(10)),
            MockReplyGenerator::new().with_delay(Duration::from_secs(10)),
        );

        let submission = f.controller.submit("hi").accepted().unwrap();
        f.controller.stop();
        let (reply, classification) = submission.join().await;

        assert_eq!(reply, ReplyOutcome::Cancelled);
        assert_eq!(classification, ClassificationOutcome::Cancelled);
        assert_eq!(f.controller.transcript().len(), 1);
        assert_eq!(f.controller.state(), ConversationState::Idle);
        assert!(f.controller.input_enabled());
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_rejects_later_lines() {
        let f = fixture(MockEmotionClassifier::new(), MockReplyGenerator::new());

        f.controller.stop();
        f.controller.stop();

        assert!(matches!(
            f.controller.submit("hello?"),
            SubmitOutcome::Ignored(IgnoreReason::Stopped)
        ));
        let (_tx, rx) = mpsc::channel(1);
        assert_eq!(f.controller.start(rx).unwrap_err(), ControllerError::Stopped);
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let f = fixture(MockEmotionClassifier::new(), MockReplyGenerator::new());
        let (_tx1, rx1) = mpsc::channel(1);
        let (_tx2, rx2) = mpsc::channel(1);

        f.controller.start(rx1).unwrap();
        assert_eq!(
            f.controller.start(rx2).unwrap_err(),
            ControllerError::AlreadyStarted
        );
        f.controller.stop();
    }

    #[tokio::test]
    async fn start_shows_opening_line_without_recording_it() {
        let f = fixture(MockEmotionClassifier::new(), MockReplyGenerator::new());
        let (_tx, rx) = mpsc::channel(1);

        f.controller.start(rx).unwrap();

        assert_eq!(
            f.display.lines(),
            vec![format!("Friend: {}", DEFAULT_OPENING_LINE)]
        );
        assert_eq!(f.display.input_toggles(), vec![true]);
        assert!(f.controller.transcript().is_empty());
        f.controller.stop();
    }

    #[tokio::test]
    async fn listener_forwards_lines_until_the_source_closes() {
        let f = fixture(
            MockEmotionClassifier::new(),
            MockReplyGenerator::new().with_reply("Friend: heyyy"),
        );
        let (tx, rx) = mpsc::channel(4);

        let listener = f.controller.start(rx).unwrap();
        tx.send("hi there".to_string()).await.unwrap();
        drop(tx);
        listener.await.unwrap();

        // The line was accepted synchronously, so the gate is closed here.
        f.controller.wait_until_idle().await;
        assert_eq!(f.controller.transcript()[1].text(), "heyyy");
    }

    #[tokio::test]
    async fn stop_ends_the_listener() {
        let f = fixture(MockEmotionClassifier::new(), MockReplyGenerator::new());
        let (_tx, rx) = mpsc::channel(1);

        let listener = f.controller.start(rx).unwrap();
        f.controller.stop();

        tokio::time::timeout(Duration::from_secs(1), listener)
            .await
            .expect("listener should stop")
            .unwrap();
    }
}

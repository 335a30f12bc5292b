//! Chat turn orchestration.
//!
//! A [`Session`] owns one conversation: its settings, its transcript, and the client used to reach
//! the provider.  Sessions share nothing, so each connected user gets an independent one.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::client::CompletionClient;
use crate::error::{Error, Result};
use crate::export;
use crate::observability::{
    SESSION_BUSY_REJECTIONS, SESSION_TURN_ERRORS, SESSION_TURNS, SESSION_VALIDATION_REJECTIONS,
};
use crate::prompt;
use crate::store::ConversationStore;
use crate::types::{CompletionRequest, ConversationConfig, Message};

/// Assistant reply recorded when a message is submitted with no output type selected.
pub const VALIDATION_MESSAGE: &str = "Please select at least one feature.";

/// Observer for the advisory "typing" indicator.
///
/// Both methods default to doing nothing.  They are called only for turns that reach the provider.
pub trait TurnProgress: Send {
    /// The request is about to be sent.
    fn typing_started(&mut self) {}

    /// The request finished, successfully or not.
    fn typing_finished(&mut self) {}
}

/// A [`TurnProgress`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl TurnProgress for NoProgress {}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The provider replied.
    Replied,
    /// No output type was selected; nothing was sent.
    Rejected,
    /// The request failed; the transcript holds an error notice instead of a reply.
    Failed,
}

/// What the caller renders after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    /// The full transcript after the turn.
    pub transcript: Vec<Message>,
    /// The new contents of the input field, which a turn always clears.
    pub input: String,
    /// How the turn ended.
    pub outcome: TurnOutcome,
}

/// Aggregated stats for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The model used for the next turn.
    pub model: String,
    /// The creativity used for the next turn.
    pub creativity: f32,
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// Turns submitted, including rejected ones.
    pub turns: u64,
    /// Turns whose request failed.
    pub failed_turns: u64,
}

/// One user's conversation.
///
/// At most one turn is in flight at a time; a [`Session::submit`] made while another is awaiting
/// its reply fails with [`Error::Busy`] and leaves the transcript untouched.
pub struct Session<C: CompletionClient> {
    client: C,
    config: Mutex<ConversationConfig>,
    store: Mutex<ConversationStore>,
    in_flight: AtomicBool,
    turns: AtomicU64,
    failed_turns: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the single-flight flag for the duration of a turn.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<C: CompletionClient> Session<C> {
    /// Creates a session with an empty transcript.
    pub fn new(client: C, config: ConversationConfig) -> Self {
        Self {
            client,
            config: Mutex::new(config),
            store: Mutex::new(ConversationStore::new()),
            in_flight: AtomicBool::new(false),
            turns: AtomicU64::new(0),
            failed_turns: AtomicU64::new(0),
        }
    }

    /// The client this session sends requests through.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Submits a message without observing progress.
    pub async fn submit(&self, text: &str) -> Result<TurnView> {
        self.submit_with_progress(text, &mut NoProgress).await
    }

    /// Runs one turn.
    ///
    /// The turn appends exactly two messages: the user's message, then either the reply, the
    /// fixed [`VALIDATION_MESSAGE`] when no output type is selected, or an error notice when the
    /// request fails.  Request failures are reported through the transcript, not as `Err`; the
    /// only error returned is [`Error::Busy`].
    pub async fn submit_with_progress(
        &self,
        text: &str,
        progress: &mut dyn TurnProgress,
    ) -> Result<TurnView> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            SESSION_BUSY_REJECTIONS.click();
            return Err(Error::busy("a reply is still pending for this session"));
        };
        self.turns.fetch_add(1, Ordering::Relaxed);
        SESSION_TURNS.click();
        let config = self.config();
        let user = Message::user(text);

        if !config.has_output_types() {
            SESSION_VALIDATION_REJECTIONS.click();
            tracing::debug!("turn rejected: no output type selected");
            return Ok(self.finish_turn(user, VALIDATION_MESSAGE, TurnOutcome::Rejected));
        }

        let history = lock(&self.store).snapshot();
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(prompt::system_prompt(&config)));
        messages.extend(history);
        messages.push(user.clone());
        let request = CompletionRequest::new(config.model(), messages, config.creativity());

        progress.typing_started();
        let result = self.client.complete(&request).await;
        progress.typing_finished();

        match result {
            Ok(reply) => Ok(self.finish_turn(user, reply, TurnOutcome::Replied)),
            Err(err) => {
                SESSION_TURN_ERRORS.click();
                self.failed_turns.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %err, model = config.model(), "turn failed");
                Ok(self.finish_turn(user, err.turn_notice(), TurnOutcome::Failed))
            }
        }
    }

    fn finish_turn(
        &self,
        user: Message,
        assistant: impl Into<String>,
        outcome: TurnOutcome,
    ) -> TurnView {
        let mut store = lock(&self.store);
        store.append_turn(user, Message::assistant(assistant));
        TurnView {
            transcript: store.snapshot(),
            input: String::new(),
            outcome,
        }
    }

    /// True while a turn is waiting for the provider.
    pub fn is_awaiting_reply(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// A copy of the current settings.
    pub fn config(&self) -> ConversationConfig {
        lock(&self.config).clone()
    }

    /// Replaces the settings.  A turn already in flight keeps the settings it started with.
    pub fn set_config(&self, config: ConversationConfig) {
        *lock(&self.config) = config;
    }

    /// Mutates the settings in place.
    pub fn update_config<R>(&self, f: impl FnOnce(&mut ConversationConfig) -> R) -> R {
        f(&mut lock(&self.config))
    }

    /// A copy of the transcript.
    pub fn transcript(&self) -> Vec<Message> {
        lock(&self.store).snapshot()
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        lock(&self.store).len()
    }

    /// Empties the transcript.
    pub fn clear(&self) {
        lock(&self.store).clear();
    }

    /// The transcript as download text, or `None` when it is empty.
    pub fn export(&self) -> Option<Vec<u8>> {
        export::export(&self.transcript())
    }

    /// Writes the transcript to a new temporary `.txt` file and returns its path.
    pub fn save_transcript(&self) -> Result<Option<PathBuf>> {
        export::write_temp_file(&self.transcript())
    }

    /// Writes the transcript to `path`; `false` when there was nothing to write.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        export::write_to(path, &self.transcript())
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let config = self.config();
        SessionStats {
            model: config.model().to_string(),
            creativity: config.creativity(),
            message_count: self.message_count(),
            turns: self.turns.load(Ordering::Relaxed),
            failed_turns: self.failed_turns.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageRole, OutputType};

    struct Echo;

    #[async_trait::async_trait]
    impl CompletionClient for Echo {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            let last = request.messages.last().map(Message::content).unwrap_or("");
            Ok(format!("echo: {last}"))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<&'static str>,
    }

    impl TurnProgress for Recorder {
        fn typing_started(&mut self) {
            self.events.push("started");
        }

        fn typing_finished(&mut self) {
            self.events.push("finished");
        }
    }

    fn config() -> ConversationConfig {
        ConversationConfig::new("llama-3.1-8b-instant").with_output_types([OutputType::Roadmap])
    }

    #[test]
    fn new_session_empty() {
        let session = Session::new(Echo, config());
        assert_eq!(session.message_count(), 0);
        assert!(session.export().is_none());
        assert!(!session.is_awaiting_reply());
    }

    #[tokio::test]
    async fn progress_brackets_the_request() {
        let session = Session::new(Echo, config());
        let mut recorder = Recorder::default();
        let view = session.submit_with_progress("hi", &mut recorder).await.unwrap();
        assert_eq!(recorder.events, vec!["started", "finished"]);
        assert_eq!(view.outcome, TurnOutcome::Replied);
        assert_eq!(view.input, "");
        assert_eq!(view.transcript[1].content(), "echo: hi");
    }

    #[tokio::test]
    async fn rejected_turn_skips_progress() {
        let session = Session::new(Echo, ConversationConfig::new("m"));
        let mut recorder = Recorder::default();
        let view = session.submit_with_progress("hi", &mut recorder).await.unwrap();
        assert!(recorder.events.is_empty());
        assert_eq!(view.outcome, TurnOutcome::Rejected);
        assert_eq!(view.transcript[1].role(), MessageRole::Assistant);
        assert_eq!(view.transcript[1].content(), VALIDATION_MESSAGE);
        assert_eq!(session.stats().turns, 1);
        assert_eq!(session.stats().failed_turns, 0);
    }

    #[tokio::test]
    async fn set_config_applies_to_the_next_turn() {
        let session = Session::new(Echo, ConversationConfig::new("m"));
        assert_eq!(session.submit("first").await.unwrap().outcome, TurnOutcome::Rejected);
        session.set_config(config().with_model("other"));
        assert_eq!(session.config().model(), "other");
        let view = session.submit("second").await.unwrap();
        assert_eq!(view.outcome, TurnOutcome::Replied);
        assert_eq!(view.transcript.len(), 4);
        assert_eq!(session.stats().model, "other");
    }

    #[tokio::test]
    async fn update_config_and_stats() {
        let session = Session::new(Echo, ConversationConfig::new("m"));
        session.update_config(|c| c.toggle_output_type(OutputType::ResumeTips));
        session.update_config(|c| c.set_creativity(0.3)).unwrap();
        session.submit("resume?").await.unwrap();
        let stats = session.stats();
        assert_eq!(stats.message_count, 2);
        assert_eq!(stats.turns, 1);
        assert_eq!(stats.failed_turns, 0);
        assert_eq!(stats.creativity, 0.3);
        assert_eq!(stats.model, "m");
    }

    #[tokio::test]
    async fn clear_session() {
        let session = Session::new(Echo, config());
        session.submit("one").await.unwrap();
        assert_eq!(session.message_count(), 2);
        session.clear();
        assert_eq!(session.message_count(), 0);
        session.clear();
        assert!(session.transcript().is_empty());
    }
}

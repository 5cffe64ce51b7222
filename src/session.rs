use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chat_provider::{CompletionError, CompletionProvider, CompletionRequest};
use chat_store::{now_rfc3339, FileStore, StoreError, TranscriptSnapshot, KEY_TRANSCRIPT};

use crate::modes::StudyMode;
use crate::request::{assemble, ReplayPolicy};
use crate::transcript::{Transcript, Turn};

/// Failure classes for one submitted turn.
#[derive(Debug)]
pub enum SessionError {
    /// Empty or whitespace-only input; rejected before any turn is
    /// recorded.
    EmptyInput,
    /// A completion is already outstanding for this session; the new
    /// submission is rejected, not queued.
    TurnInFlight,
    /// The session was cleared while the request was outstanding; the
    /// arrived completion was discarded, not applied.
    TurnDiscarded,
    /// The provider call failed; the unanswered user turn remains in the
    /// transcript so a retry resends it.
    Completion(CompletionError),
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("input is empty"),
            Self::TurnInFlight => f.write_str("a completion is already in flight"),
            Self::TurnDiscarded => f.write_str("completion discarded after clear"),
            Self::Completion(error) => write!(f, "{error}"),
            Self::Store(error) => write!(f, "storage failure: {error}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Completion(error) => Some(error),
            Self::Store(error) => Some(error),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

/// What the startup restore found in the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No snapshot was stored; the conversation starts fresh.
    Empty,
    /// The stored snapshot was applied, with this many turns.
    Restored(usize),
    /// The stored snapshot was unreadable and has been discarded; the
    /// conversation starts fresh. Never fatal.
    RecoveredFromCorrupt,
}

#[derive(Debug)]
struct SessionState {
    transcript: Transcript,
    mode: StudyMode,
    in_flight: bool,
    // Bumped by clear(); a completion that returns under an older epoch
    // is discarded instead of applied.
    epoch: u64,
}

/// One conversation session: owns the transcript, funnels one completion
/// at a time, and persists a snapshot after every successful exchange.
///
/// There are no process-wide singletons; the caller owns the session and
/// hands it to whatever front end drives it.
pub struct ChatSession {
    state: Mutex<SessionState>,
    provider: Arc<dyn CompletionProvider>,
    store: FileStore,
    replay_policy: ReplayPolicy,
}

impl ChatSession {
    /// Opens a session, restoring the persisted transcript exactly once.
    ///
    /// A malformed snapshot is deleted and the session starts empty;
    /// corruption is reported through [`RestoreOutcome`], never as an
    /// error.
    pub fn open(
        provider: Arc<dyn CompletionProvider>,
        store: FileStore,
        mode: StudyMode,
        replay_policy: ReplayPolicy,
    ) -> Result<(Self, RestoreOutcome), StoreError> {
        let (transcript, outcome) = match store.get(KEY_TRANSCRIPT)? {
            None => (Transcript::new(), RestoreOutcome::Empty),
            Some(raw) => match TranscriptSnapshot::decode(&raw) {
                Ok(snapshot) => {
                    let transcript = Transcript::restore(snapshot);
                    let turns = transcript.len();
                    (transcript, RestoreOutcome::Restored(turns))
                }
                Err(error) if error.is_corrupt_snapshot() => {
                    store.delete(KEY_TRANSCRIPT)?;
                    (Transcript::new(), RestoreOutcome::RecoveredFromCorrupt)
                }
                Err(error) => return Err(error),
            },
        };

        let session = Self {
            state: Mutex::new(SessionState {
                transcript,
                mode,
                in_flight: false,
                epoch: 0,
            }),
            provider,
            store,
            replay_policy,
        };
        Ok((session, outcome))
    }

    #[must_use]
    pub fn mode(&self) -> StudyMode {
        self.lock_state().mode
    }

    pub fn set_mode(&self, mode: StudyMode) {
        self.lock_state().mode = mode;
    }

    #[must_use]
    pub fn turns(&self) -> Vec<Turn> {
        self.lock_state().transcript.snapshot().to_vec()
    }

    #[must_use]
    pub fn is_awaiting_completion(&self) -> bool {
        self.lock_state().in_flight
    }

    /// Runs one user turn: append, assemble, complete, apply, persist.
    ///
    /// The await on the provider is the only suspend point. Exactly one
    /// submission may be suspended there per session; a concurrent one is
    /// rejected with [`SessionError::TurnInFlight`] before any provider
    /// call happens.
    pub async fn submit(&self, input: &str) -> Result<String, SessionError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let (epoch, messages) = {
            let mut state = self.lock_state();
            if state.in_flight {
                return Err(SessionError::TurnInFlight);
            }
            state.in_flight = true;
            state.transcript.push_user(text);
            let messages = assemble(state.mode, &state.transcript, self.replay_policy);
            (state.epoch, messages)
        };

        let result = self
            .provider
            .complete(CompletionRequest::new(messages))
            .await;

        let mut state = self.lock_state();
        state.in_flight = false;
        if state.epoch != epoch {
            return Err(SessionError::TurnDiscarded);
        }

        match result {
            Ok(reply) => {
                state.transcript.push_assistant(reply.clone());
                self.persist(&state.transcript)?;
                Ok(reply)
            }
            Err(error) => Err(SessionError::Completion(error)),
        }
    }

    /// Empties the transcript and deletes the persisted snapshot. An
    /// outstanding completion, if any, will be discarded when it returns.
    pub fn clear(&self) -> Result<(), StoreError> {
        {
            let mut state = self.lock_state();
            state.transcript.clear();
            state.epoch += 1;
        }
        self.store.delete(KEY_TRANSCRIPT)
    }

    fn persist(&self, transcript: &Transcript) -> Result<(), StoreError> {
        let snapshot = transcript.to_stored(now_rfc3339()?);
        self.store.set(KEY_TRANSCRIPT, &snapshot.encode()?)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        lock_unpoisoned(&self.state)
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

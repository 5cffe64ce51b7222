use chat_store::{SnapshotMessage, SnapshotRole, TranscriptSnapshot};

/// Speaker of one recorded turn. The system instruction is injected at
/// request-assembly time, so it has no variant here and can never be
/// recorded by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

/// One immutable recorded turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: TurnRole,
    content: String,
}

impl Turn {
    #[must_use]
    pub fn role(&self) -> TurnRole {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered record of the exchanged turns in one conversation.
///
/// Insertion order defines the replay order sent to the model. The
/// transcript is owned by the session; persistence holds only a
/// serialized snapshot of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: TurnRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: TurnRole::Assistant,
            content: content.into(),
        });
    }

    /// Full ordered turn list, for replay and serialization.
    #[must_use]
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Rebuilds a transcript from a decoded stored snapshot.
    #[must_use]
    pub fn restore(snapshot: TranscriptSnapshot) -> Self {
        let turns = snapshot
            .messages
            .into_iter()
            .map(|message| Turn {
                role: match message.role {
                    SnapshotRole::User => TurnRole::User,
                    SnapshotRole::Assistant => TurnRole::Assistant,
                },
                content: message.content,
            })
            .collect();
        Self { turns }
    }

    /// Produces the external representation written to the store.
    #[must_use]
    pub fn to_stored(&self, saved_at: impl Into<String>) -> TranscriptSnapshot {
        let messages = self
            .turns
            .iter()
            .map(|turn| {
                SnapshotMessage::new(
                    match turn.role {
                        TurnRole::User => SnapshotRole::User,
                        TurnRole::Assistant => SnapshotRole::Assistant,
                    },
                    turn.content.clone(),
                )
            })
            .collect();
        TranscriptSnapshot::v1(saved_at, messages)
    }
}

#[cfg(test)]
mod tests {
    use super::{Transcript, TurnRole};

    const SAVED_AT: &str = "2026-08-25T12:00:00Z";

    #[test]
    fn turns_are_recorded_in_append_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("2+2?");
        transcript.push_assistant("4");
        transcript.push_user("and 3+3?");

        let snapshot = transcript.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].role(), TurnRole::User);
        assert_eq!(snapshot[0].content(), "2+2?");
        assert_eq!(snapshot[1].role(), TurnRole::Assistant);
        assert_eq!(snapshot[2].content(), "and 3+3?");
    }

    #[test]
    fn restore_of_a_stored_snapshot_round_trips() {
        let mut transcript = Transcript::new();
        transcript.push_user("define osmosis");
        transcript.push_assistant("Movement of solvent across a membrane.");

        let restored = Transcript::restore(transcript.to_stored(SAVED_AT));
        assert_eq!(restored, transcript);
    }

    #[test]
    fn round_trip_survives_the_wire_encoding() {
        let mut transcript = Transcript::new();
        transcript.push_user("first");
        transcript.push_assistant("second");

        let encoded = transcript.to_stored(SAVED_AT).encode().unwrap();
        let decoded = chat_store::TranscriptSnapshot::decode(&encoded).unwrap();
        assert_eq!(Transcript::restore(decoded), transcript);
    }

    #[test]
    fn clear_empties_the_transcript() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
    }
}

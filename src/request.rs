use chat_provider::Message;

use crate::modes::StudyMode;
use crate::transcript::{Transcript, Turn, TurnRole};

/// How much of the transcript is replayed to the model each turn.
///
/// `FullHistory` resends everything, a deliberate simplicity/cost
/// trade-off inherited from the original design: context growth is
/// unbounded. `MaxTurns(n)` is the documented opt-in cap and replays only
/// the final `n` recorded turns; nothing ever truncates silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplayPolicy {
    #[default]
    FullHistory,
    MaxTurns(usize),
}

/// Builds the outbound message list: the mode's system instruction
/// followed by every replayed transcript turn, in conversation order.
#[must_use]
pub fn assemble(mode: StudyMode, transcript: &Transcript, policy: ReplayPolicy) -> Vec<Message> {
    let turns = transcript.snapshot();
    let replayed: &[Turn] = match policy {
        ReplayPolicy::FullHistory => turns,
        ReplayPolicy::MaxTurns(limit) => &turns[turns.len().saturating_sub(limit)..],
    };

    let mut messages = Vec::with_capacity(1 + replayed.len());
    messages.push(Message::system(mode.instruction()));
    messages.extend(replayed.iter().map(|turn| match turn.role() {
        TurnRole::User => Message::user(turn.content()),
        TurnRole::Assistant => Message::assistant(turn.content()),
    }));
    messages
}

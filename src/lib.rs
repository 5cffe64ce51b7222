//! Study-assistant chat session runtime and terminal front end.
//!
//! ## Provider bootstrap
//!
//! `study_buddy` selects a completion provider at startup:
//!
//! - `STUDY_BUDDY_PROVIDER=groq` (default) for the Groq chat-completions
//!   transport
//! - `STUDY_BUDDY_PROVIDER=mock` for deterministic local runs and tests
//!
//! The Groq provider resolves its credential through a `CredentialSource`:
//! a key previously saved in the local store (client-supplied mode), or the
//! `GROQ_API_KEY` environment variable (server-configured mode). The secret
//! is held in memory for the session and never logged.
//!
//! ## Conversation memory contract
//!
//! The session owns the ordered transcript and replays it in full on every
//! turn; the subject-mode system instruction is injected at assembly time
//! and never stored. The transcript snapshot is persisted after every
//! successful assistant turn and deleted on `/clear`. A snapshot that fails
//! to decode at startup is discarded and the session starts empty.
//!
//! One completion may be outstanding per session; a second submission while
//! one is in flight is rejected rather than queued.

pub mod commands;
pub mod modes;
pub mod providers;
pub mod request;
pub mod session;
pub mod transcript;

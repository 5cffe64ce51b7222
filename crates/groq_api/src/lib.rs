//! Transport-only client primitives for an OpenAI-compatible
//! chat-completions endpoint.
//!
//! This crate owns request building, response parsing, and HTTP failure
//! classification for the provider wire contract only. It intentionally
//! contains no transcript state, no credential-source policy, and no UI
//! coupling; callers hand it a fully assembled message list and receive
//! the first completion choice's text or a typed error.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod url;

pub use reqwest::StatusCode;

pub use client::GroqApiClient;
pub use config::GroqApiConfig;
pub use error::{classify_status, parse_error_message, GroqApiError};
pub use payload::{ChatMessage, ChatRequest, ChatResponse};
pub use url::normalize_chat_completions_url;

//! Boundary to the external text/vision reasoning service.
//!
//! The pipeline talks to the model through one narrow interface:
//! [`ReasoningClient::generate`] takes a prompt and an optional image
//! and returns a [`ReasoningReply`] holding plain text. Everything the
//! wire might send that does not fit that shape is rejected at this
//! boundary as a `Reasoning` error.

pub mod client;
pub mod config;
pub mod gemini;
pub mod retry;

pub use client::{ImagePart, ReasoningClient, ReasoningReply};
pub use config::{ReasoningConfig, build_reasoning_client};
pub use gemini::GeminiClient;
pub use retry::{RetryConfig, RetryingClient};

//! `OpenAI` chat-completions client for rewriting product descriptions.
//!
//! # Components
//!
//! - [`GenerationClient`] - HTTP client for the chat completions endpoint
//! - [`prompt`] - The fixed system instruction and user message template
//! - [`types`] - Request/response types for the API
//! - [`GenerationError`] - Error type

mod client;
mod error;
pub mod prompt;
pub mod types;

pub use client::GenerationClient;
pub use error::GenerationError;

//! OpenAI-compatible chat completions: turns the aggregated context into an answer.

pub mod client;
pub mod types;

pub use client::{AnswerClient, OpenAiClient, OpenAiError};

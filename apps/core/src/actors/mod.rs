//! # Actors
//!
//! The request pipeline around the brain:
//! - `supervisor`: per-request orchestration and the supervisor actor
//! - `generator`: reply generation with customer-safe failure mapping
//! - `prompt`: intent-conditioned system prompt
//! - `llm`: HTTP client for the completion API
//! - `traits`: the completion API seam
//! - `messages`: actor messages and error types

pub mod generator;
pub mod llm;
pub mod messages;
pub mod prompt;
pub mod supervisor;
pub mod traits;

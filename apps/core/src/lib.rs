//! Telecom customer-support chat backend.
//!
//! A message is classified against a JSON intent catalog with a lexical
//! scorer, checked for escalation, and answered by a hosted chat-completion
//! API conditioned on the intent. Every failure of that API is turned into a
//! fixed customer-safe reply.

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;

#[cfg(test)]
mod tests;

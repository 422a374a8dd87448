//! Test Module
//!
//! Cross-module test suite for the chat backend.
//!
//! ## Test Categories
//! - `brain_tests`: Classification against the shipped intent catalog
//! - `actor_tests`: Reply generation through the HTTP completion client
//! - `supervisor_tests`: Pipeline orchestration, escalation and concurrency
//! - `integration_tests`: HTTP endpoints end to end

pub mod supervisor_tests;

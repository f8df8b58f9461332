//! Tutor Common - Shared library for the Code Tutor CLI
//!
//! Core concern: turning free-form LLM responses into typed, validated
//! structures the interactive sessions can trust. Everything here is
//! synchronous and the parsers are total - malformed model output degrades
//! to empty fields plus contract diagnostics, never to a crashed session.

pub mod analyzer;
pub mod config;
pub mod contract;
pub mod conversation;
pub mod exercise_generator;
pub mod exercise_store;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod proof_analyzer;
pub mod proof_file;
pub mod session_log;
pub mod source_file;
pub mod teaching;

//! Gemini-backed event source for expocal.
//!
//! Events are found in two requests against `generateContent`:
//! 1. a free-text search with the Google Search tool enabled, and
//! 2. a schema-constrained extraction of that text into JSON records.
//!
//! Either request failing fails the whole fetch.

mod client;
mod prompts;
mod protocol;
mod source;

pub use client::GeminiClient;
pub use source::{GeminiSettings, GeminiSource};

// crates/gemchat-server/src/llm/gemini/mod.rs
// Google Gemini API client

mod client;

pub use client::{DEFAULT_API_BASE, DEFAULT_MODEL, GeminiClient, RELAY_GENERATION_CONFIG};

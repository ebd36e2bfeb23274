// crates/gemchat-server/src/llm/mod.rs
// Upstream generative model clients

pub mod gemini;

pub use gemini::GeminiClient;

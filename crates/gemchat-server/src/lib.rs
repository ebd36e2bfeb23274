// crates/gemchat-server/src/lib.rs
// gemchat - relays chat messages from the widget to the Gemini API

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod relay;

pub use error::{RelayError, Result};

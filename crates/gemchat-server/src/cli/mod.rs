// crates/gemchat-server/src/cli/mod.rs
// CLI module for gemchat commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod ask;
pub mod chat;
pub mod check;
pub mod serve;

pub use ask::run_ask;
pub use chat::run_chat;
pub use check::run_check;
pub use serve::run_serve;

#[derive(Parser)]
#[command(name = "gemchat")]
#[command(about = "Chat relay for the Google Gemini API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay server (default)
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory with the chat front end, served at /
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Send one message through the relay pipeline and print the reply
    Ask {
        /// Message text
        #[arg(index = 1)]
        message: String,

        /// Image to attach
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Interactive terminal chat against a running relay
    Chat {
        /// Base URL of the relay
        #[arg(long, env = "GEMCHAT_RELAY_URL", default_value = "http://localhost:3000")]
        relay_url: String,
    },

    /// Validate configuration and print a report
    Check,
}

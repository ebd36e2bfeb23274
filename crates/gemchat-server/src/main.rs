// crates/gemchat-server/src/main.rs
// gemchat - chat relay for the Google Gemini API

use anyhow::Result;
use clap::Parser;
use gemchat::cli::{Cli, Commands, run_ask, run_chat, run_check, run_serve};
use gemchat::config::CliOverrides;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".gemchat/.env"));
    }
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging based on command
    let log_level = match &cli.command {
        Some(Commands::Serve { .. }) | None => Level::INFO,
        Some(Commands::Check) => Level::INFO,
        // keep the terminal readable for interactive and one-shot use
        Some(Commands::Ask { .. }) | Some(Commands::Chat { .. }) => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None => run_serve(CliOverrides::default()).await?,
        Some(Commands::Serve {
            host,
            port,
            static_dir,
        }) => {
            run_serve(CliOverrides {
                host,
                port,
                static_dir,
            })
            .await?
        }
        Some(Commands::Ask { message, image }) => run_ask(message, image.as_deref()).await?,
        Some(Commands::Chat { relay_url }) => run_chat(&relay_url).await?,
        Some(Commands::Check) => run_check()?,
    }

    Ok(())
}
